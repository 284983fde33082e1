//! Test infrastructure shared by service integration tests.


pub(crate) use context::TestContext;
