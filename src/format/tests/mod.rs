#![cfg(test)]

mod sniffer_tests;
mod extractor_tests;
