//! Use-case services over the domain model.
//!
//! Everything here is synchronous and request-scoped: callers construct
//! the services against their repositories and one cache scope, run them
//! to completion, and drop them.

pub mod jobs;
pub mod lifecycle;
pub mod repos;
pub mod resolver;
pub mod sitemap;
pub mod social_images;

pub use jobs::{JobDescriptor, JobOutbox};
pub use lifecycle::LocalizationLifecycle;
pub use repos::{ContentsRepo, DefaultsRepo, EntriesRepo, RepoError, TermsRepo};
pub use resolver::{CascadeChain, DefaultsResolver};
pub use sitemap::{SitemapBuilder, SitemapError, SitemapItem, SitemapService};
pub use social_images::{GateTrigger, SOCIAL_MEDIA_SET, SocialImageGate};
