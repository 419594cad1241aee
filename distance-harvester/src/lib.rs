pub mod step1_load;
pub mod step2_resolve;
pub mod step3_write;
