//! Stable-Diffusion-compatible generation backend adapter
//!
//! Implements the `GenerationClient` port against the `/sdapi/v1/txt2img`
//! HTTP endpoint exposed by Stable-Diffusion web UIs.

mod client;

pub use client::{SdApiConfig, StableDiffusionApi};
