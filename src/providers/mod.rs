pub mod openai;
pub mod traits;

#[cfg(test)]
pub mod fake;
