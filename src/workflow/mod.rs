pub mod assignment_grader;
pub mod debounce;
pub mod facet_state;
pub mod pagination;
pub mod question_browser;
pub mod recommendation_poller;

pub use assignment_grader::{
    accuracy_percent, reconcile_correct_index, AssignmentGrader, GradeReport, QuestionGrade,
    Submission,
};
pub use debounce::{QueryDebouncer, QueryInput};
pub use facet_state::{FacetDimension, FacetState};
pub use pagination::{LoadMode, PageOutcome, PageTicket, PaginationController};
pub use question_browser::{fetch_page, BrowseOutcome, PendingPage, QuestionBrowser};
pub use recommendation_poller::RecommendationPoller;
