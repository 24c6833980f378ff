use std::io::{Cursor, Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::{NewRecipe, UpdateRecipe};
use crate::forms::{NAME_MAX_LEN, NAME_MAX_LEN_VALIDATOR, sanitize_inline_text};

/// Maximum number of integer digits in a price (five digits, two of them cents).
const PRICE_MAX_INTEGER_DIGITS: usize = 3;
const PRICE_DECIMAL_PLACES: usize = 2;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing recipe payloads.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("title cannot be empty")]
    EmptyTitle,
    /// A nested tag or ingredient name is empty or too long after sanitization.
    #[error("invalid {kind} name: {reason}")]
    InvalidName {
        kind: &'static str,
        reason: &'static str,
    },
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("error reading uploaded file")]
    FileRead(#[from] std::io::Error),
    /// The upload could not be decoded as an image.
    #[error("upload a valid image: {0}")]
    InvalidImage(String),
}

/// A price as sent by clients: either a decimal string (`"5.00"`) or a JSON
/// number (`5.5`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    /// Convert the price into integer cents.
    pub fn to_cents(&self) -> RecipeFormResult<i64> {
        match self {
            PriceInput::Text(text) => parse_price(text),
            PriceInput::Number(number) => parse_price(&number.to_string()),
        }
    }
}

/// A nested `{"name": ..}` record naming a tag or an ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedItem {
    pub name: String,
}

/// Payload accepted by `POST /api/recipes` and `PUT /api/recipes/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddRecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub title: String,
    #[validate(range(min = 0))]
    pub time_minutes: i32,
    pub price: PriceInput,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub link: String,
    #[serde(default)]
    pub tags: Option<Vec<NamedItem>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NamedItem>>,
}

impl AddRecipeForm {
    /// Validates and sanitizes the payload into a domain `NewRecipe`.
    pub fn into_new_recipe(self, user_id: i32) -> RecipeFormResult<NewRecipe> {
        let fields = self.into_fields()?;

        let mut recipe = NewRecipe::new(
            user_id,
            fields.title,
            fields.time_minutes,
            fields.price_cents,
        )
        .with_description(fields.description)
        .with_link(fields.link);
        recipe.tags = fields.tags;
        recipe.ingredients = fields.ingredients;

        Ok(recipe)
    }

    /// Validates the payload into a full replacement of the recipe.
    ///
    /// Every scalar field is overwritten; omitted `description`/`link` become
    /// empty. Omitted nested lists leave the associations untouched.
    pub fn into_replacement(self, updated_at: NaiveDateTime) -> RecipeFormResult<UpdateRecipe> {
        let fields = self.into_fields()?;

        let mut update = UpdateRecipe::new(updated_at)
            .title(fields.title)
            .time_minutes(fields.time_minutes)
            .price_cents(fields.price_cents)
            .description(fields.description)
            .link(fields.link);
        update.tags = fields.tags;
        update.ingredients = fields.ingredients;

        Ok(update)
    }

    fn into_fields(self) -> RecipeFormResult<RecipeFields> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(RecipeFormError::EmptyTitle);
        }

        Ok(RecipeFields {
            title,
            time_minutes: self.time_minutes,
            price_cents: self.price.to_cents()?,
            description: self.description.trim().to_string(),
            link: self.link.trim().to_string(),
            tags: sanitize_names(self.tags, "tag")?,
            ingredients: sanitize_names(self.ingredients, "ingredient")?,
        })
    }
}

struct RecipeFields {
    title: String,
    time_minutes: i32,
    price_cents: i64,
    description: String,
    link: String,
    tags: Option<Vec<String>>,
    ingredients: Option<Vec<String>>,
}

/// Payload accepted by `PATCH /api/recipes/{id}`; only supplied fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditRecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub time_minutes: Option<i32>,
    pub price: Option<PriceInput>,
    pub description: Option<String>,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub link: Option<String>,
    pub tags: Option<Vec<NamedItem>>,
    pub ingredients: Option<Vec<NamedItem>>,
}

impl EditRecipeForm {
    /// Validates and sanitizes the payload into a domain `UpdateRecipe`.
    pub fn into_update_recipe(self, updated_at: NaiveDateTime) -> RecipeFormResult<UpdateRecipe> {
        self.validate()?;

        let title = match self.title {
            Some(title) => {
                let sanitized = sanitize_inline_text(&title);
                if sanitized.is_empty() {
                    return Err(RecipeFormError::EmptyTitle);
                }
                Some(sanitized)
            }
            None => None,
        };

        let price_cents = match self.price {
            Some(price) => Some(price.to_cents()?),
            None => None,
        };

        Ok(UpdateRecipe {
            title,
            time_minutes: self.time_minutes,
            price_cents,
            description: self.description.map(|value| value.trim().to_string()),
            link: self.link.map(|value| value.trim().to_string()),
            tags: sanitize_names(self.tags, "tag")?,
            ingredients: sanitize_names(self.ingredients, "ingredient")?,
            updated_at,
        })
    }
}

#[derive(MultipartForm)]
/// Multipart form for `POST /api/recipes/{id}/image`.
pub struct UploadRecipeImageForm {
    #[multipart(limit = "10MB")]
    /// Uploaded image file.
    pub image: TempFile,
}

/// A decoded upload ready to be written to the media root.
#[derive(Debug)]
pub struct RecipeImage {
    pub bytes: Vec<u8>,
    /// File extension matching the detected image format.
    pub extension: &'static str,
}

impl UploadRecipeImageForm {
    /// Read the uploaded file and check that it decodes as an image.
    pub fn read_image(&mut self) -> RecipeFormResult<RecipeImage> {
        self.image.file.rewind()?;
        let mut bytes = Vec::new();
        self.image.file.read_to_end(&mut bytes)?;
        decode_image(bytes)
    }
}

/// Detect the format of `bytes` from its signature and fully decode it.
pub fn decode_image(bytes: Vec<u8>) -> RecipeFormResult<RecipeImage> {
    let reader = image::io::Reader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;

    let format = reader.format().ok_or_else(|| {
        RecipeFormError::InvalidImage("the file is not an image or is corrupted".to_string())
    })?;
    let extension = format
        .extensions_str()
        .first()
        .copied()
        .ok_or_else(|| RecipeFormError::InvalidImage(format!("unsupported format {format:?}")))?;

    reader
        .decode()
        .map_err(|err| RecipeFormError::InvalidImage(err.to_string()))?;

    Ok(RecipeImage { bytes, extension })
}

fn sanitize_names(
    items: Option<Vec<NamedItem>>,
    kind: &'static str,
) -> RecipeFormResult<Option<Vec<String>>> {
    let Some(items) = items else {
        return Ok(None);
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let name = sanitize_inline_text(&item.name);
        if name.is_empty() {
            return Err(RecipeFormError::InvalidName {
                kind,
                reason: "name cannot be empty",
            });
        }
        if name.chars().count() > NAME_MAX_LEN {
            return Err(RecipeFormError::InvalidName {
                kind,
                reason: "name is too long",
            });
        }
        names.push(name);
    }

    Ok(Some(names))
}

/// Parse a non-negative decimal with at most two fractional and three integer
/// digits into cents.
fn parse_price(input: &str) -> RecipeFormResult<i64> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(RecipeFormError::InvalidPrice(
            "price cannot be negative".to_string(),
        ));
    }

    let not_a_number =
        || RecipeFormError::InvalidPrice(format!("'{trimmed}' is not a valid number"));

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (trimmed, ""),
    };

    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return Err(not_a_number());
    }

    if fraction.len() > PRICE_DECIMAL_PLACES {
        return Err(RecipeFormError::InvalidPrice(format!(
            "ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places"
        )));
    }

    let integer = integer.trim_start_matches('0');
    if integer.len() > PRICE_MAX_INTEGER_DIGITS {
        return Err(RecipeFormError::InvalidPrice(format!(
            "ensure that there are no more than {PRICE_MAX_INTEGER_DIGITS} digits before the decimal point"
        )));
    }

    let whole: i64 = if integer.is_empty() {
        0
    } else {
        integer.parse().map_err(|_| not_a_number())?
    };
    let cents: i64 = format!("{fraction:0<2}")
        .parse()
        .map_err(|_| not_a_number())?;

    Ok(whole * 100 + cents)
}
