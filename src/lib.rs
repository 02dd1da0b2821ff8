//! [GoFile.io](https://gofile.io) is a cloud file-storage service with a
//! small REST API for uploading and managing files and folders.
//!
//! This crate supplies a rust client to access the API functions: server
//! discovery, folder creation, streaming file upload with progress
//! reporting, content update/delete and account lookup.
//!
//! To use the client instantiate a [`GofileClient`] and call the methods of
//! the [`GofileApi`] trait.  The API token is taken from the
//! `GOFILE_API_TOKEN` environment variable, or can be supplied explicitly
//! through a [`ClientConfig`]:
//!
//! [`GofileClient`]: crate::client::GofileClient
//! [`GofileApi`]: crate::client::GofileApi
//! [`ClientConfig`]: crate::config::ClientConfig
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::{Arc, Mutex};
//!
//! use gofile::client::{GofileApi, GofileClient};
//! use gofile::upload::ProgressCallback;
//!
//! let client = GofileClient::new();
//!
//! // Everything hangs off the account's root folder.
//! let account = client.get_account_id().await?;
//! let info = client.get_account_information(&account.data.id).await?;
//! let root = info.data.root_folder;
//!
//! // Uploads go to a server from the discovery endpoint.
//! let servers = client.get_available_servers(Some("eu")).await?;
//! let server = &servers.data.servers[0].name;
//!
//! let on_progress: ProgressCallback = Arc::new(Mutex::new(|done, total| {
//!     println!("{:.2}% completed", done as f64 / total as f64 * 100.0);
//! }));
//! let uploaded = client
//!     .upload_file(server, Path::new("report.pdf"), &root, Some(on_progress))
//!     .await?;
//! println!("download page: {}", uploaded.data.download_page);
//! ```
//!
//! Large files are streamed from disk into the request body, so memory usage
//! stays bounded no matter the file size.  The `status` field the service
//! embeds in every response body is returned as-is; callers decide whether a
//! logical failure (a `status` other than `ok`) is an error for them.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod upload;
