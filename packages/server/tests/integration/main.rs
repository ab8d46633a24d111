
mod benchmark;
mod reconcile;
mod summarizer;
mod user;
