//! Integration-style tests exercising the full pipeline:
//! construction -> minimization -> scanning.

mod scanner_tests;
