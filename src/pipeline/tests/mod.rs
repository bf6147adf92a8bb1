mod common;

mod activity;
