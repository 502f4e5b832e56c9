pub mod analysis;
pub mod upload;

pub use analysis::AnalysisHandler;
pub use upload::{read_food_image, FOOD_IMAGE_FIELD};
