pub mod table;
pub mod validator;

pub use table::{write_submission_file, PredictionTable};
pub use validator::{PredictionValidator, SchemaValidator};
