pub mod account;
pub mod assignment;
pub mod catalog;
pub mod class;
pub mod question;
pub mod recommendation;
pub mod timestamp;

pub use account::{LoginReply, RegisterReply, RegisterRequest, Session};
pub use assignment::{AnswerProgress, AssignmentQuestion, AssignmentStatus, ClassAssignment, ClassDetail};
pub use class::{Announcement, JoinMode, JoinOutcome, StudentClass};
pub use question::{Identified, QuestionDetail, QuestionSummary, SearchQuery};
pub use recommendation::RecommendedPractice;
