mod common;
mod simulation;
