pub mod ast;
pub mod filter;
pub mod validator;
