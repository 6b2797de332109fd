mod common;
mod documents;
mod machine;
