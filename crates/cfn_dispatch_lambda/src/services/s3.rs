use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};
use serde_json::Value;

use crate::adapters::capability::Capability;
use crate::runtime::kwargs::{Kwargs, KwargsError};
use crate::services::{sdk_error_text, unsupported_method};

pub const S3_SERVICE: &str = "s3";
pub const S3_METHODS: &[&str] = &[
    "create_bucket",
    "delete_bucket",
    "put_object",
    "delete_object",
    "put_bucket_versioning",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S3Call {
    CreateBucket {
        bucket: String,
        acl: Option<String>,
        location_constraint: Option<String>,
    },
    DeleteBucket {
        bucket: String,
    },
    PutObject {
        bucket: String,
        key: String,
        body: Option<Vec<u8>>,
        content_type: Option<String>,
    },
    DeleteObject {
        bucket: String,
        key: String,
    },
    PutBucketVersioning {
        bucket: String,
        status: String,
    },
}

impl S3Call {
    pub fn parse(method: &str, properties: &Value) -> Result<Self, String> {
        let mut kwargs = Kwargs::from_value(properties).map_err(|error| error.to_string())?;
        let call = parse_kwargs(method, &mut kwargs)
            .map_err(|error| error.to_string())?
            .ok_or_else(|| unsupported_method(S3_SERVICE, method))?;
        kwargs.finish().map_err(|error| error.to_string())?;
        Ok(call)
    }
}

fn parse_kwargs(method: &str, kwargs: &mut Kwargs) -> Result<Option<S3Call>, KwargsError> {
    let call = match method {
        "create_bucket" => {
            let bucket = kwargs.required_str("Bucket")?;
            let acl = kwargs.optional_str("ACL")?;
            let location_constraint = match kwargs.optional_structure("CreateBucketConfiguration")? {
                Some(mut configuration) => {
                    let location = configuration.optional_str("LocationConstraint")?;
                    configuration.finish()?;
                    location
                }
                None => None,
            };
            S3Call::CreateBucket {
                bucket,
                acl,
                location_constraint,
            }
        }
        "delete_bucket" => S3Call::DeleteBucket {
            bucket: kwargs.required_str("Bucket")?,
        },
        "put_object" => S3Call::PutObject {
            bucket: kwargs.required_str("Bucket")?,
            key: kwargs.required_str("Key")?,
            body: kwargs.optional_blob("Body")?,
            content_type: kwargs.optional_str("ContentType")?,
        },
        "delete_object" => S3Call::DeleteObject {
            bucket: kwargs.required_str("Bucket")?,
            key: kwargs.required_str("Key")?,
        },
        "put_bucket_versioning" => {
            let bucket = kwargs.required_str("Bucket")?;
            let mut configuration = kwargs.required_structure("VersioningConfiguration")?;
            let status = configuration.required_str("Status")?;
            configuration.finish()?;
            S3Call::PutBucketVersioning { bucket, status }
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

pub struct S3Capability {
    client: aws_sdk_s3::Client,
}

impl S3Capability {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl Capability for S3Capability {
    fn service_name(&self) -> &str {
        S3_SERVICE
    }

    fn methods(&self) -> &[&'static str] {
        S3_METHODS
    }

    fn invoke(&self, method: &str, properties: &Value) -> Result<(), String> {
        let call = S3Call::parse(method, properties)?;
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(send_call(client, call))
        })
    }
}

async fn send_call(client: aws_sdk_s3::Client, call: S3Call) -> Result<(), String> {
    match call {
        S3Call::CreateBucket {
            bucket,
            acl,
            location_constraint,
        } => {
            let configuration = location_constraint.map(|location| {
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location.as_str()))
                    .build()
            });
            client
                .create_bucket()
                .bucket(bucket)
                .set_acl(acl.map(|value| BucketCannedAcl::from(value.as_str())))
                .set_create_bucket_configuration(configuration)
                .send()
                .await
                .map(|_| ())
                .map_err(sdk_error_text)
        }
        S3Call::DeleteBucket { bucket } => client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
        S3Call::PutObject {
            bucket,
            key,
            body,
            content_type,
        } => client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body.unwrap_or_default()))
            .set_content_type(content_type)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
        S3Call::DeleteObject { bucket, key } => client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
        S3Call::PutBucketVersioning { bucket, status } => client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::from(status.as_str()))
                    .build(),
            )
            .send()
            .await
            .map(|_| ())
            .map_err(sdk_error_text),
    }
}
