pub use super::upload::Entity as Upload;
