//! 筛选项全量目录
//!
//! 结果集为空时的兜底候选；有结果后候选项由结果动态收敛

pub const GRADES: &[&str] = &[
    "grade1", "grade2", "grade3", "grade4", "grade5", "grade6", "grade7", "grade8", "grade9",
    "grade10", "grade11", "grade12",
];

pub const SUBJECTS: &[&str] = &["language science", "natural science", "social science"];

pub const CATEGORIES: &[&str] = &[
    "Adaptations",
    "Adaptations and natural selection",
    "Age of Exploration",
    "Analyzing literature",
    "Anatomy and physiology",
    "Animals",
    "Asia: society and environment",
    "Astronomy",
    "Atoms and molecules",
    "Author's purpose",
    "Author's purpose and tone",
    "Basic economic principles",
    "Banking and finance",
    "Biochemistry",
    "Capitalization",
    "Categories",
    "Cells",
    "Chemical reactions",
    "Cities",
    "Classification",
    "Classification and scientific names",
    "Climate change",
    "Colonial America",
    "Comprehension strategies",
    "Conservation",
    "Conservation and natural resources",
    "Context clues",
    "Creative techniques",
    "Cultural celebrations",
    "Designing experiments",
    "Descriptive details",
    "Developing and supporting arguments",
    "Domain-specific vocabulary",
    "Early 19th century American history",
    "Early China",
    "Early Modern Europe",
    "Early Americas",
    "Earth events",
    "Earth's features",
    "Economics",
    "Editing and revising",
    "Electricity",
    "Ecological interactions",
    "Engineering practices",
    "English colonies in North America",
    "Fossils",
    "Force and motion",
    "Formatting",
    "Genes to traits",
    "Geography",
    "Greece",
    "Government",
    "Heat and thermal energy",
    "Heredity",
    "Historical figures",
    "Independent reading comprehension",
    "Informational texts: level 1",
    "Islamic empires",
    "Kinetic and potential energy",
    "Literary devices",
    "Magnets",
    "Maps",
    "Materials",
    "Mixtures",
    "Natural resources and human impacts",
    "Oceania: geography",
    "Oceans and continents",
    "Opinion writing",
    "Particle motion and energy",
    "Persuasive strategies",
    "Phrases and clauses",
    "Photosynthesis",
    "Physical Geography",
    "Physical and chemical change",
    "Plant reproduction",
    "Plants",
    "Poetry elements",
    "Pronouns",
    "Pronouns and antecedents",
    "Read-alone texts",
    "Reading-comprehension",
    "Reference skills",
    "Research skills",
    "Rhyming",
    "Rocks and minerals",
    "Scientific names",
    "Science-and-engineering-practices",
    "Sentences, fragments, and run-ons",
    "Shades of meaning",
    "Short and long vowels",
    "Social studies skills",
    "Solutions",
    "States",
    "State capitals",
    "States of matter",
    "Supply and demand",
    "Text structure",
    "The Americas: geography",
    "The Antebellum period",
    "The American Revolution",
    "The Civil War",
    "The Civil War and Reconstruction",
    "The Constitution",
    "The Early Republic",
    "The Jacksonian period",
    "The Silk Road",
    "Thermal energy",
    "Topographic maps",
    "Traits",
    "Traits and heredity",
    "Units and measurement",
    "Velocity, acceleration, and forces",
    "Verb tense",
    "Visual elements",
    "Water cycle",
    "Weather and climate",
    "Word usage and nuance",
    "World religions",
];

pub const TOPICS: &[&str] = &[
    "capitalization",
    "chemistry",
    "civics",
    "culture",
    "economics",
    "earth-science",
    "figurative-language",
    "global-studies",
    "grammar",
    "literacy-in-science",
    "phonological-awareness",
    "physics",
    "pronouns",
    "punctuation",
    "reading-comprehension",
    "reference-skills",
    "science-and-engineering-practices",
    "units-and-measurement",
    "us-history",
    "verbs",
    "vocabulary",
    "word-study",
    "world-history",
    "writing-strategies",
];
