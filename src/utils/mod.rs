use actix_multipart::Multipart;
use actix_web::{web, FromRequest};
use futures_util::{future::LocalBoxFuture, TryStreamExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{de::Deserializer, Deserialize, Serialize};
use validator::Validate;

use crate::api::error;
use crate::assets::UploadIntent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    User,
    Creator,
    Superadmin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: u64,
    pub exp: u64,
    pub role: Role,
}

impl Claims {
    pub fn decode(token: &str, secret: &[u8]) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}

/// Accepts either a JSON array or a comma separated string.
pub fn comma_separated<'de, D>(de: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(de)?.map(|value| match value {
        OneOrMany::One(joined) => split_list(&joined),
        OneOrMany::Many(items) => items,
    }))
}

pub fn split_list(joined: &str) -> Vec<String> {
    joined.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `"Hero Tales: Vol 2"` -> `"hero-tales-vol-2"`. Word boundaries are
/// non-alphanumeric characters and lower-to-upper case transitions.
pub fn kebab_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

pub fn is_kebab_case(value: &str) -> Result<(), validator::ValidationError> {
    if !value.is_empty() && kebab_case(value) == value {
        Ok(())
    } else {
        Err(validator::ValidationError::new("kebab_case"))
    }
}

/// Read the first file part of a multipart body into an upload for `field`.
pub async fn read_file_part(
    mut payload: Multipart,
    field: &'static str,
    max_size: usize,
) -> Result<UploadIntent, error::Error> {
    while let Some(mut part) =
        payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
    {
        let Some(file_name) = part.content_disposition().and_then(|cd| cd.get_filename()) else {
            continue;
        };
        let file_name = file_name.to_string();
        let content_type = part.content_type().map(|m| m.to_string());

        let mut bytes = bytes::BytesMut::new();
        while let Some(chunk) =
            part.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
        {
            if bytes.len() + chunk.len() > max_size {
                return Err(error::Error::bad_request(format!(
                    "File size exceeds maximum allowed size of {max_size} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(error::Error::bad_request(format!("No valid {field} file provided")));
        }

        return Ok(UploadIntent::new(field, Some(file_name), content_type, bytes.freeze()));
    }

    Err(error::Error::bad_request(format!("No valid {field} file provided")))
}

/// Turn an optional multipart file field into an upload for `field`.
pub fn file_intent(
    field: &'static str,
    part: Option<actix_multipart::form::bytes::Bytes>,
) -> Option<UploadIntent> {
    part.filter(|part| !part.data.is_empty()).map(|part| {
        UploadIntent::new(
            field,
            part.file_name,
            part.content_type.map(|m| m.to_string()),
            part.data,
        )
    })
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);

        Box::pin(async move {
            let query = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            query.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedQuery(query.into_inner()))
        })
    }
}
