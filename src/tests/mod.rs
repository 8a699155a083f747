use fixture::{Fixture, TestHost};


mod random_ops;
