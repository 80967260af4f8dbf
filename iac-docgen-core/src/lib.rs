#![doc = "iac-docgen-core: core pipeline for iac-docgen."]

//! This crate turns folders of infrastructure-as-code (Terraform, CDK) into a
//! `README.md` and a `generate_diagram.py` per folder, using an external
//! text-generation service.
//!
//! # Usage
//! Build a [`config::PipelineConfig`], provide a [`contract::Generator`]
//! implementation and call [`pipeline::process_repository`] with a
//! [`split::FenceSplitter`].

pub mod aggregate;
pub mod config;
pub mod contract;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod split;
pub mod write;
