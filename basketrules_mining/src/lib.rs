pub mod api;

pub mod itemset_miner;

pub mod rule_generator;

pub mod support_table;
