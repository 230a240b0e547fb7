mod cascade_tests;
mod follow_tests;
mod like_tests;
mod transaction_tests;
