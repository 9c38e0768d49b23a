// Campaign generation: request schema, prompt assembly, one completion call,
// and normalization of the model's output into a schema-valid response.
// All completion calls go through llm_client::CompletionProvider.

#[cfg(test)]
pub mod fixtures;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod schema;
