mod category;
mod ids;
mod question;
mod result;
mod session;

pub use ids::{ParseIdError, UserId, UserProfile};

pub use category::{CatalogError, CategoryName, CategoryNameError, SpecialtyCatalog};
pub use question::{
    AnswerOption, Question, QuestionBank, QuestionBankError, QuestionDraft, ScoreMap,
};
pub use result::{RankedCategory, ResultRecord};
pub use session::{RecordedAnswer, ScoreBoard, SessionState};
