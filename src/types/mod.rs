pub mod answer;
pub mod config;
pub mod pillar;
pub mod question;
pub mod report;
