pub mod dedup;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod text;
