//! Public URLs for objects recorded by the media offload integration.

use crate::config::OffloadConfig;
use crate::serialized::string_field;

/// Where the offload integration put an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Provider key as stored by the integration (`aws`, `do`, `gcp`).
    pub provider: String,
    pub region: String,
    pub bucket: String,
    /// Object key, e.g. `wp-content/uploads/2024/05/pic.jpg`.
    pub key: String,
}

/// Location from the serialized `amazonS3_info` postmeta written by older
/// offload plugin versions. Those predate other providers, so a missing
/// `provider` means `aws`. `None` without a bucket and key.
pub fn legacy_location(info: &str) -> Option<ObjectLocation> {
    let bucket = string_field(info, "bucket").filter(|b| !b.is_empty())?;
    let key = string_field(info, "key").filter(|k| !k.is_empty())?;
    Some(ObjectLocation {
        provider: string_field(info, "provider").unwrap_or("aws").to_string(),
        region: string_field(info, "region").unwrap_or_default().to_string(),
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// Public URL of `location`, or `None` for an unknown provider without a
/// configured delivery domain.
pub fn object_url(location: &ObjectLocation, offload: Option<&OffloadConfig>) -> Option<String> {
    let key = location.key.trim_start_matches('/');
    if let Some(domain) = offload.and_then(|o| o.delivery_domain.as_deref()) {
        return Some(format!("https://{}/{}", domain.trim_end_matches('/'), key));
    }

    let bucket = &location.bucket;
    let region = location.region.as_str();
    match location.provider.as_str() {
        "aws" if region.is_empty() || region == "us-east-1" => {
            Some(format!("https://{bucket}.s3.amazonaws.com/{key}"))
        }
        "aws" => Some(format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")),
        "do" => Some(format!("https://{bucket}.{region}.digitaloceanspaces.com/{key}")),
        "gcp" => Some(format!("https://storage.googleapis.com/{bucket}/{key}")),
        other => {
            tracing::debug!(provider = other, "no public endpoint known for provider");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(provider: &str, region: &str) -> ObjectLocation {
        ObjectLocation {
            provider: provider.to_string(),
            region: region.to_string(),
            bucket: "media".to_string(),
            key: "wp-content/uploads/2024/pic.jpg".to_string(),
        }
    }

    #[test]
    fn aws_endpoints() {
        assert_eq!(
            object_url(&location("aws", ""), None).as_deref(),
            Some("https://media.s3.amazonaws.com/wp-content/uploads/2024/pic.jpg")
        );
        assert_eq!(
            object_url(&location("aws", "us-east-1"), None).as_deref(),
            Some("https://media.s3.amazonaws.com/wp-content/uploads/2024/pic.jpg")
        );
        assert_eq!(
            object_url(&location("aws", "us-west-2"), None).as_deref(),
            Some("https://media.s3.us-west-2.amazonaws.com/wp-content/uploads/2024/pic.jpg")
        );
    }

    #[test]
    fn other_providers() {
        assert_eq!(
            object_url(&location("do", "nyc3"), None).as_deref(),
            Some("https://media.nyc3.digitaloceanspaces.com/wp-content/uploads/2024/pic.jpg")
        );
        assert_eq!(
            object_url(&location("gcp", ""), None).as_deref(),
            Some("https://storage.googleapis.com/media/wp-content/uploads/2024/pic.jpg")
        );
        assert_eq!(object_url(&location("minio", ""), None), None);
    }

    #[test]
    fn legacy_info_defaults_to_aws() {
        let info = "a:3:{s:6:\"bucket\";s:5:\"media\";s:3:\"key\";s:31:\"wp-content/uploads/2024/pic.jpg\";s:6:\"region\";s:9:\"eu-west-1\";}";
        let loc = legacy_location(info).unwrap();
        assert_eq!(loc.provider, "aws");
        assert_eq!(
            object_url(&loc, None).as_deref(),
            Some("https://media.s3.eu-west-1.amazonaws.com/wp-content/uploads/2024/pic.jpg")
        );
    }

    #[test]
    fn legacy_info_with_provider_and_without_key() {
        let info = "a:3:{s:8:\"provider\";s:2:\"do\";s:6:\"bucket\";s:5:\"media\";s:3:\"key\";s:7:\"pic.jpg\";}";
        assert_eq!(legacy_location(info).unwrap().provider, "do");
        assert_eq!(legacy_location("a:1:{s:6:\"bucket\";s:5:\"media\";}"), None);
        assert_eq!(legacy_location("not serialized"), None);
    }

    #[test]
    fn delivery_domain_wins() {
        let offload = OffloadConfig {
            delivery_domain: Some("cdn.example.net/".to_string()),
        };
        assert_eq!(
            object_url(&location("minio", ""), Some(&offload)).as_deref(),
            Some("https://cdn.example.net/wp-content/uploads/2024/pic.jpg")
        );
    }
}
