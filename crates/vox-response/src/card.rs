//! Cards shown in the companion app.

use serde::Serialize;
use vox_core::ResponseError;

use crate::marshal::Validate;

/// Maximum characters across a card's text fields.
pub const CARD_LIMIT: usize = 8_000;
/// Maximum characters in a card image URL.
pub const IMAGE_URL_LIMIT: usize = 2_000;

/// A card, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    /// Title and plain content.
    Simple(SimpleCard),
    /// Title, text, and an optional image.
    Standard(StandardCard),
    /// Prompts the user to link their account.
    LinkAccount,
    /// Asks the user to grant permissions.
    AskForPermissionsConsent(PermissionsConsentCard),
}

impl Card {
    /// A simple card.
    pub fn simple(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Simple(SimpleCard {
            title: title.into(),
            content: content.into(),
        })
    }

    /// A standard card. The large image defaults to the small one.
    pub fn standard(
        title: impl Into<String>,
        text: impl Into<String>,
        small_image_url: impl Into<String>,
        large_image_url: Option<String>,
    ) -> Self {
        Self::Standard(StandardCard {
            title: title.into(),
            text: text.into(),
            image: Some(CardImage::new(small_image_url, large_image_url)),
        })
    }
}

impl Validate for Card {
    fn children(&self) -> Vec<&dyn Validate> {
        match self {
            Self::Simple(card) => vec![card as &dyn Validate],
            Self::Standard(card) => vec![card as &dyn Validate],
            Self::AskForPermissionsConsent(card) => vec![card as &dyn Validate],
            Self::LinkAccount => Vec::new(),
        }
    }
}

/// Title and content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimpleCard {
    /// Card title.
    pub title: String,
    /// Card body.
    pub content: String,
}

impl Validate for SimpleCard {
    fn check(&self) -> Result<(), ResponseError> {
        let joined = format!("{}{}", self.title, self.content);
        ResponseError::check_size("Card", &joined, CARD_LIMIT)
    }
}

/// Title, text, and an optional image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StandardCard {
    /// Card title.
    pub title: String,
    /// Card body.
    pub text: String,
    /// Card image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,
}

impl Validate for StandardCard {
    fn children(&self) -> Vec<&dyn Validate> {
        vec![&self.image as &dyn Validate]
    }

    fn check(&self) -> Result<(), ResponseError> {
        let joined = format!("{}{}", self.title, self.text);
        ResponseError::check_size("Card", &joined, CARD_LIMIT)
    }
}

/// Image URLs for a standard card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    /// Small image URL.
    pub small_image_url: String,
    /// Large image URL.
    pub large_image_url: String,
}

impl CardImage {
    /// Build an image; `large` falls back to `small`.
    pub fn new(small: impl Into<String>, large: Option<String>) -> Self {
        let small = small.into();
        let large = large.unwrap_or_else(|| small.clone());
        Self {
            small_image_url: small,
            large_image_url: large,
        }
    }
}

impl Validate for CardImage {
    fn check(&self) -> Result<(), ResponseError> {
        ResponseError::check_size("smallImageUrl", &self.small_image_url, IMAGE_URL_LIMIT)?;
        ResponseError::check_size("largeImageUrl", &self.large_image_url, IMAGE_URL_LIMIT)
    }
}

/// A permission a skill may request consent for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    /// Read the household list.
    #[serde(rename = "read::alexa:household:list")]
    ReadHouseholdList,
    /// Write the household list.
    #[serde(rename = "write::alexa:household:list")]
    WriteHouseholdList,
    /// Read the full device address.
    #[serde(rename = "read::alexa:device:all:address")]
    ReadFullAddress,
    /// Read the device country and postal code.
    #[serde(rename = "read::alexa:device:all:address:country_and_postal_code")]
    ReadCountryAndPostalCode,
}

/// Consent request for a set of permissions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PermissionsConsentCard {
    /// Requested permissions, in request order.
    pub permissions: Vec<Permission>,
}

impl Validate for PermissionsConsentCard {}
