//! Request payloads and response structures for the API
use std::collections::HashMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GofileError, Result};

/// Whether a content entry is a file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Folder,
}

/// One of the six content attributes recognized by the update endpoint,
/// carrying its properly-typed new value.
///
/// The API wants `tags` as a single comma-joined string and `expiry` as Unix
/// epoch seconds; both conversions happen when the payload is built, so a
/// malformed expiry timestamp fails before any request is issued.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentAttribute {
    Name(String),
    Description(String),
    Tags(Vec<String>),
    Public(bool),
    /// An RFC3339 timestamp, e.g. `2024-01-01T00:00:00Z`
    Expiry(String),
    Password(String),
}

impl ContentAttribute {
    /// The attribute name as the API spells it
    pub fn attribute_name(&self) -> &'static str {
        match self {
            ContentAttribute::Name(_) => "name",
            ContentAttribute::Description(_) => "description",
            ContentAttribute::Tags(_) => "tags",
            ContentAttribute::Public(_) => "public",
            ContentAttribute::Expiry(_) => "expiry",
            ContentAttribute::Password(_) => "password",
        }
    }

    /// Builds a [`ContentAttribute`] from an attribute name and an untyped
    /// JSON value, for callers bridging from dynamic input such as CLI flags.
    ///
    /// Fails with [`GofileError::TypeMismatch`] when the value does not have
    /// the type the attribute expects, or [`GofileError::UnsupportedAttribute`]
    /// when the name is not one of the six recognized attributes.
    pub fn from_dynamic(attribute: &str, value: Value) -> Result<Self> {
        match attribute {
            "name" => match value {
                Value::String(s) => Ok(ContentAttribute::Name(s)),
                _ => Err(GofileError::type_mismatch("name", "a string")),
            },
            "description" => match value {
                Value::String(s) => Ok(ContentAttribute::Description(s)),
                _ => Err(GofileError::type_mismatch("description", "a string")),
            },
            "tags" => match value {
                Value::Array(items) => {
                    let mut tags = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(s) => tags.push(s),
                            _ => {
                                return Err(GofileError::type_mismatch(
                                    "tags",
                                    "an array of strings",
                                ))
                            }
                        }
                    }
                    Ok(ContentAttribute::Tags(tags))
                }
                _ => Err(GofileError::type_mismatch("tags", "an array of strings")),
            },
            "public" => match value {
                Value::Bool(b) => Ok(ContentAttribute::Public(b)),
                _ => Err(GofileError::type_mismatch("public", "a boolean")),
            },
            "expiry" => match value {
                Value::String(s) => Ok(ContentAttribute::Expiry(s)),
                _ => Err(GofileError::type_mismatch(
                    "expiry",
                    "an RFC3339 timestamp string",
                )),
            },
            "password" => match value {
                Value::String(s) => Ok(ContentAttribute::Password(s)),
                _ => Err(GofileError::type_mismatch("password", "a string")),
            },
            other => Err(GofileError::UnsupportedAttribute(other.to_string())),
        }
    }

    pub(crate) fn into_payload(self) -> Result<UpdateContentPayload> {
        let attribute = self.attribute_name();
        let attribute_value = match self {
            ContentAttribute::Name(s)
            | ContentAttribute::Description(s)
            | ContentAttribute::Password(s) => Value::String(s),
            ContentAttribute::Tags(tags) => Value::String(tags.join(",")),
            ContentAttribute::Public(b) => Value::Bool(b),
            ContentAttribute::Expiry(timestamp) => {
                let parsed = DateTime::parse_from_rfc3339(&timestamp).map_err(|_| {
                    GofileError::type_mismatch("expiry", "an RFC3339 timestamp string")
                })?;
                Value::from(parsed.timestamp())
            }
        };
        Ok(UpdateContentPayload {
            attribute,
            attribute_value,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateContentPayload {
    pub attribute: &'static str,
    #[serde(rename = "attributeValue")]
    pub attribute_value: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFolderPayload {
    #[serde(rename = "parentFolderId")]
    pub parent_folder_id: String,
    #[serde(rename = "folderName")]
    pub folder_name: String,
}

/// The delete endpoint takes the IDs joined into one comma-separated string
#[derive(Debug, Serialize)]
pub(crate) struct DeleteContentsPayload {
    #[serde(rename = "contentsId")]
    pub contents_id: String,
}

impl DeleteContentsPayload {
    pub fn new(content_ids: &[String]) -> Result<Self> {
        if content_ids.is_empty() {
            return Err(GofileError::required("content_ids"));
        }
        Ok(Self {
            contents_id: content_ids.join(","),
        })
    }
}

/// A server with its name and zone
#[derive(Debug, Deserialize, Serialize)]
pub struct Server {
    /// Name of the server, e.g. `store1`
    pub name: String,
    /// Zone where the server is located, e.g. `eu` or `na`
    pub zone: String,
}

/// The response from the available-servers operation
#[derive(Debug, Deserialize, Serialize)]
pub struct AvailableServersResponse {
    pub status: String,
    pub data: AvailableServers,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AvailableServers {
    /// Servers in the requested zone
    pub servers: Vec<Server>,
    /// Servers across all zones
    #[serde(rename = "serversAllZone")]
    pub servers_all_zone: Vec<Server>,
}

/// The response from the account-id operation
#[derive(Debug, Deserialize, Serialize)]
pub struct AccountIdResponse {
    pub status: String,
    pub data: AccountId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AccountId {
    /// ID of the user account
    pub id: String,
}

/// The response from the account-information operation
///
/// This is where the root folder ID can be obtained from.
#[derive(Debug, Deserialize, Serialize)]
pub struct AccountInformationResponse {
    pub status: String,
    pub data: AccountInformation,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AccountInformation {
    #[serde(rename = "ipTraffic30")]
    pub ip_traffic30: i64,
    /// ID of the user account
    pub id: String,
    /// Time the account was created
    #[serde(rename = "createTime")]
    pub create_time: i64,
    /// Email address of the user
    pub email: String,
    /// Tier of the account, e.g. `standard`
    pub tier: String,
    /// Bearer token for the Authorization header
    pub token: String,
    /// ID of the user's root folder
    #[serde(rename = "rootFolder")]
    pub root_folder: String,
    #[serde(rename = "statsCurrent")]
    pub stats_current: CurrentStats,
}

/// Counters for the user's root folder
#[derive(Debug, Deserialize, Serialize)]
pub struct CurrentStats {
    #[serde(rename = "folderCount")]
    pub folder_count: i64,
    #[serde(rename = "fileCount")]
    pub file_count: i64,
    pub storage: i64,
}

/// The response from the create-folder operation
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateFolderResponse {
    pub status: String,
    pub data: CreatedFolder,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedFolder {
    /// ID of the new folder
    pub id: String,
    /// ID of the creator of the folder
    pub owner: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Name of the folder
    pub name: String,
    /// ID of the parent folder
    #[serde(rename = "parentFolder")]
    pub parent_folder: String,
    #[serde(rename = "createTime")]
    pub create_time: String,
    #[serde(rename = "modTime")]
    pub mod_time: String,
    /// Short code of the folder
    pub code: String,
}

/// The response from the upload-file operation
#[derive(Debug, Deserialize, Serialize)]
pub struct UploadFileResponse {
    pub status: String,
    pub data: UploadedFile,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UploadedFile {
    /// Time the file was uploaded
    #[serde(rename = "createTime")]
    pub create_time: i64,
    /// Download link page for the file
    #[serde(rename = "downloadPage")]
    pub download_page: String,
    /// ID of the file on the server
    pub id: String,
    /// MD5 hash of the uploaded content
    pub md5: String,
    /// Mime type of the file, e.g. `application/zip`
    pub mimetype: String,
    #[serde(rename = "modTime")]
    pub mod_time: i64,
    /// Name of the uploaded file
    pub name: String,
    /// ID of the parent folder
    #[serde(rename = "parentFolder")]
    pub parent_folder: String,
    /// Short code of the parent folder
    #[serde(rename = "parentFolderCode")]
    pub parent_folder_code: String,
    /// Names of the servers the file is stored on
    pub servers: Vec<String>,
    /// Size of the file in bytes
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

/// The response from the update-content operation
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateContentResponse {
    pub status: String,
    pub data: UpdatedContent,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatedContent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub name: String,
    #[serde(rename = "createTime")]
    pub create_time: i64,
    #[serde(rename = "modTime")]
    pub mod_time: i64,
    #[serde(rename = "parentFolder")]
    pub parent_folder: String,
    // File-specific fields, absent for folders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// The response from the delete-contents operation
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteContentResponse {
    pub status: String,
    /// Per-content deletion outcome, keyed by content ID
    pub data: HashMap<String, DeleteResult>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteResult {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn tags_join_with_comma() {
        let payload = ContentAttribute::Tags(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ])
        .into_payload()
        .unwrap();

        assert_eq!(payload.attribute, "tags");
        assert_eq!(payload.attribute_value, json!("a,b,c"));
    }

    #[test]
    fn expiry_converts_to_epoch_seconds() {
        let payload = ContentAttribute::Expiry("2024-01-01T00:00:00Z".to_string())
            .into_payload()
            .unwrap();

        assert_eq!(payload.attribute, "expiry");
        assert_eq!(payload.attribute_value, json!(1704067200));
    }

    #[test]
    fn malformed_expiry_is_rejected() {
        let err = ContentAttribute::Expiry("tomorrow".to_string())
            .into_payload()
            .unwrap_err();

        assert!(matches!(
            err,
            GofileError::TypeMismatch { ref attribute, .. } if attribute == "expiry"
        ));
    }

    #[test]
    fn update_payload_wire_format() {
        let payload = ContentAttribute::Name("testfile1_renamed".to_string())
            .into_payload()
            .unwrap();
        let encoded = serde_json::to_string(&payload).unwrap();

        assert_eq!(
            encoded,
            r#"{"attribute":"name","attributeValue":"testfile1_renamed"}"#
        );
    }

    #[test]
    fn from_dynamic_recognizes_all_attributes() {
        let cases = vec![
            ("name", json!("n"), ContentAttribute::Name("n".to_string())),
            (
                "description",
                json!("d"),
                ContentAttribute::Description("d".to_string()),
            ),
            (
                "tags",
                json!(["a", "b"]),
                ContentAttribute::Tags(vec!["a".to_string(), "b".to_string()]),
            ),
            ("public", json!(true), ContentAttribute::Public(true)),
            (
                "expiry",
                json!("2024-01-01T00:00:00Z"),
                ContentAttribute::Expiry("2024-01-01T00:00:00Z".to_string()),
            ),
            (
                "password",
                json!("pw"),
                ContentAttribute::Password("pw".to_string()),
            ),
        ];

        for (name, value, expected) in cases {
            assert_eq!(ContentAttribute::from_dynamic(name, value).unwrap(), expected);
        }
    }

    #[test]
    fn from_dynamic_rejects_wrong_types() {
        let err = ContentAttribute::from_dynamic("public", json!("yes")).unwrap_err();
        assert!(matches!(
            err,
            GofileError::TypeMismatch { ref attribute, expected } if attribute == "public" && expected == "a boolean"
        ));

        let err = ContentAttribute::from_dynamic("tags", json!(["a", 1])).unwrap_err();
        assert!(matches!(err, GofileError::TypeMismatch { .. }));
    }

    #[test]
    fn from_dynamic_rejects_unknown_attribute() {
        let err = ContentAttribute::from_dynamic("color", json!("red")).unwrap_err();
        assert!(matches!(
            err,
            GofileError::UnsupportedAttribute(ref name) if name == "color"
        ));
    }

    #[test]
    fn delete_payload_joins_ids() {
        let payload = DeleteContentsPayload::new(&[
            "id-1".to_string(),
            "id-2".to_string(),
        ])
        .unwrap();
        assert_eq!(payload.contents_id, "id-1,id-2");
    }

    #[test]
    fn delete_payload_requires_ids() {
        let err = DeleteContentsPayload::new(&[]).unwrap_err();
        assert!(matches!(err, GofileError::InvalidInput(_)));
    }

    #[test]
    fn servers_response_decodes() {
        let body = json!({
            "status": "ok",
            "data": {
                "servers": [{"name": "store1", "zone": "eu"}],
                "serversAllZone": [
                    {"name": "store1", "zone": "eu"},
                    {"name": "store5", "zone": "na"}
                ]
            }
        });

        let decoded: AvailableServersResponse = serde_json::from_value(body).unwrap();
        assert_eq!(decoded.status, "ok");
        assert_eq!(decoded.data.servers.len(), 1);
        assert_eq!(decoded.data.servers_all_zone.len(), 2);
        assert_eq!(decoded.data.servers[0].name, "store1");
    }

    #[test]
    fn update_response_folder_has_no_file_fields() {
        let body = json!({
            "status": "ok",
            "data": {
                "id": "f-1",
                "type": "folder",
                "name": "renamed",
                "createTime": 1700000000,
                "modTime": 1700000100,
                "parentFolder": "root-1"
            }
        });

        let decoded: UpdateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(decoded.data.kind, ContentKind::Folder);
        assert!(decoded.data.mimetype.is_none());
        assert!(decoded.data.size.is_none());
    }
}
