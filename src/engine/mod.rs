pub mod edit_stack;
pub mod matcher;
pub mod progress;
pub mod repeat;
pub mod tokenizer;
pub mod unit;
pub mod validator;
