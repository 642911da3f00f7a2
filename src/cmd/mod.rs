pub mod import;
pub mod review_loop;
