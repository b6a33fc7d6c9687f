mod indexing;
mod searching;
