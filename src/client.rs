//! A Rust definition of the API and a client to access it
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    config::ClientConfig,
    error::{GofileError, Result},
    model::{
        AccountIdResponse, AccountInformationResponse, AvailableServersResponse, ContentAttribute,
        CreateFolderPayload, CreateFolderResponse, DeleteContentResponse, DeleteContentsPayload,
        UpdateContentResponse, UploadFileResponse,
    },
    upload::{self, ProgressCallback},
};

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// A client for interacting with the GoFile.io storage API
///
/// A client is cheap to construct and safe to share between concurrent calls:
/// the configuration is read-only after construction and the underlying HTTP
/// connection pool handles its own synchronization.
pub struct GofileClient {
    /// The underlying HTTP client, owned by this instance
    http: Client,
    /// The configuration settings for the API client
    config: ClientConfig,
}

/// Error responses carry the failure code in their `status` field,
/// e.g. `error-auth`
#[derive(Deserialize)]
struct ApiStatusBody {
    status: String,
}

impl GofileClient {
    /// Creates a new client with the default configuration.  The API token is
    /// taken from the `GOFILE_API_TOKEN` environment variable if present.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new client from an explicit configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn get_api_url(&self, pathname: &str) -> String {
        url_join(self.config.base_url.clone(), pathname.to_string())
    }

    fn get_upload_url(&self, server: &str) -> String {
        match &self.config.upload_base_url {
            Some(base) => url_join(base.clone(), "/contents/uploadfile".to_string()),
            None => format!("https://{}.gofile.io/contents/uploadfile", server),
        }
    }

    fn add_authorization_header(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .config
            .api_token
            .as_ref()
            .ok_or(GofileError::NotAuthenticated())?;
        Ok(request.header("Authorization", format!("Bearer {}", token)))
    }

    /// Sends the request, retrying network-level failures with exponential
    /// backoff up to the configured retry count.  Requests whose body cannot
    /// be replayed (the streaming upload) are sent exactly once.
    async fn send_with_retry(&self, request: RequestBuilder) -> Result<Response> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;
        loop {
            let current = match request.try_clone() {
                Some(clone) => clone,
                None => return Ok(request.send().await?),
            };
            match current.send().await {
                Ok(response) => return Ok(response),
                Err(err)
                    if attempt < self.config.retry_count
                        && (err.is_connect() || err.is_timeout()) =>
                {
                    attempt += 1;
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn handle_error(response: Response) -> GofileError {
        let status = response.status();
        if status.as_u16() >= 500 {
            return GofileError::unknown_error(status);
        }
        match response.json::<ApiStatusBody>().await {
            Ok(body) => GofileError::ApiError(status.as_u16(), body.status),
            Err(_) => GofileError::unknown_error(status),
        }
    }

    /// Decodes a response body into the endpoint's result structure.  The
    /// `status` field embedded in 2xx bodies is returned as-is for the caller
    /// to inspect.
    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for GofileClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Functions defined in the GoFile API
#[async_trait]
pub trait GofileApi {
    /// Retrieves the servers currently accepting uploads
    ///
    /// # Arguments
    ///
    /// * `zone` - Restricts the result to one geographic zone (`eu` or `na`).
    ///            Servers across all zones are returned either way.
    ///
    /// # Returns
    ///
    /// The response from the servers operation
    async fn get_available_servers(&self, zone: Option<&str>) -> Result<AvailableServersResponse>;

    /// Creates a folder under the specified parent folder
    ///
    /// # Arguments
    ///
    /// * `parent_folder_id` - ID of the folder to create the new folder in
    /// * `name` - Name of the new folder
    ///
    /// # Returns
    ///
    /// The response from the create operation, including the new folder's ID
    async fn create_folder(
        &self,
        parent_folder_id: &str,
        name: &str,
    ) -> Result<CreateFolderResponse>;

    /// Deletes the files and folders with the given content IDs
    ///
    /// Fails without issuing a request when `content_ids` is empty.
    ///
    /// # Returns
    ///
    /// The response from the delete operation, with one entry per content ID
    async fn delete_contents(&self, content_ids: &[String]) -> Result<DeleteContentResponse>;

    /// Changes one attribute of a file or folder
    ///
    /// # Arguments
    ///
    /// * `content_id` - ID of the file or folder to modify
    /// * `attribute` - The attribute and its new, properly-typed value
    ///
    /// # Returns
    ///
    /// The response from the update operation
    async fn update_content(
        &self,
        content_id: &str,
        attribute: ContentAttribute,
    ) -> Result<UpdateContentResponse>;

    /// Gets the ID of the account the token belongs to
    async fn get_account_id(&self) -> Result<AccountIdResponse>;

    /// Gets the account information for the given account ID
    ///
    /// The root folder ID needed for uploads into the account's own space is
    /// part of the returned data.
    async fn get_account_information(
        &self,
        account_id: &str,
    ) -> Result<AccountInformationResponse>;

    /// Uploads a file to a folder on the specified server
    ///
    /// The file is streamed from disk, so arbitrarily large files use a
    /// bounded amount of memory.  Uploads are never retried; a failed upload
    /// must be restarted from scratch by the caller.
    ///
    /// # Arguments
    ///
    /// * `server` - Name of the upload server, as returned by
    ///              [`get_available_servers`](Self::get_available_servers)
    /// * `file_path` - Path of the local file to upload
    /// * `folder_id` - ID of the destination folder
    /// * `on_progress` - Optional callback invoked with
    ///                   `(bytes_sent, total_bytes)` as the upload advances
    ///
    /// # Returns
    ///
    /// The response from the upload operation
    async fn upload_file(
        &self,
        server: &str,
        file_path: &Path,
        folder_id: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadFileResponse>;
}

fn url_join(left: String, right: String) -> String {
    if left.ends_with('/') {
        if let Some(stripped) = right.strip_prefix('/') {
            left + stripped
        } else {
            left + &right
        }
    } else if right.starts_with('/') {
        left + &right
    } else {
        left + "/" + &right
    }
}

#[async_trait]
impl GofileApi for GofileClient {
    async fn get_available_servers(&self, zone: Option<&str>) -> Result<AvailableServersResponse> {
        let mut request = self
            .http
            .get(self.get_api_url("/servers"))
            .timeout(self.config.timeout);
        if let Some(zone) = zone {
            request = request.query(&[("zone", zone)]);
        }
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn create_folder(
        &self,
        parent_folder_id: &str,
        name: &str,
    ) -> Result<CreateFolderResponse> {
        let payload = CreateFolderPayload {
            parent_folder_id: parent_folder_id.to_string(),
            folder_name: name.to_string(),
        };
        let mut request = self
            .http
            .post(self.get_api_url("/contents/createFolder"))
            .timeout(self.config.timeout)
            .json(&payload);
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn delete_contents(&self, content_ids: &[String]) -> Result<DeleteContentResponse> {
        let payload = DeleteContentsPayload::new(content_ids)?;
        let mut request = self
            .http
            .delete(self.get_api_url("/contents"))
            .timeout(self.config.timeout)
            .json(&payload);
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn update_content(
        &self,
        content_id: &str,
        attribute: ContentAttribute,
    ) -> Result<UpdateContentResponse> {
        let payload = attribute.into_payload()?;
        let mut request = self
            .http
            .put(self.get_api_url(&format!("/contents/{}/update", content_id)))
            .timeout(self.config.timeout)
            .json(&payload);
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn get_account_id(&self) -> Result<AccountIdResponse> {
        let mut request = self
            .http
            .get(self.get_api_url("/accounts/getid"))
            .timeout(self.config.timeout);
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn get_account_information(
        &self,
        account_id: &str,
    ) -> Result<AccountInformationResponse> {
        let mut request = self
            .http
            .get(self.get_api_url(&format!("/accounts/{}", account_id)))
            .timeout(self.config.timeout);
        request = self.add_authorization_header(request)?;
        let response = self.send_with_retry(request).await?;
        Self::parse_response(response).await
    }

    async fn upload_file(
        &self,
        server: &str,
        file_path: &Path,
        folder_id: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadFileResponse> {
        // Opens and stats the file; an unreadable path fails here, before
        // any request is issued.
        let form = upload::file_form(file_path, folder_id, on_progress).await?;
        let mut request = self.http.post(self.get_upload_url(server)).multipart(form);
        if let Some(timeout) = self.config.upload_timeout {
            request = request.timeout(timeout);
        }
        request = self.add_authorization_header(request)?;
        let response = request.send().await?;
        Self::parse_response(response).await
    }
}
