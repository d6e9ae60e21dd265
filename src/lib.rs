//! # forum-client
//!
//! Client for a small forum backend: post listing, post detail, and
//! login / register / logout against `/api/auth/*`.
//!
//! DESIGN
//! ======
//! The [`session::SessionStore`] is the only owner of authentication state.
//! Every transition goes through a [`transport::Transport`] round-trip and is
//! committed atomically; readers get snapshots or a watch subscription.
//! [`guard`] consults those snapshots before navigation, and [`posts`] is a
//! thin typed wrapper over the read-only post endpoints.

pub mod config;
pub mod guard;
pub mod notice;
pub mod posts;
pub mod session;
pub mod transport;
