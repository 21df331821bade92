//MIT License
pub mod symbolic;
