pub mod account_service;
pub mod class_service;
pub mod dashboard_service;
pub mod practice_service;

pub use account_service::AccountService;
pub use class_service::{AssignmentView, ClassService};
pub use dashboard_service::{DashboardService, DashboardStats};
pub use practice_service::{AnswerFeedback, PracticeService, PracticeSession};
