use chrono::NaiveDateTime;
use dailydose_core::breed::derive_breed_label;
use dailydose_core::error::AppError;
use dailydose_core::models::{
    timestamp_now, AdviceRecord, BookRecord, Category, DogRecord, QuoteRecord, Record, ANONYMOUS,
    GENERAL, NO_DESCRIPTION, NO_QUOTE, UNKNOWN,
};
use dailydose_core::{EndpointConfig, HttpConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Wrapper of the advice endpoint: `{"slip": {"id": 1, "advice": "..."}}`.
#[derive(Deserialize, Debug)]
struct AdviceResponse {
    slip: AdviceSlip,
}

/// A single piece of advice. Both fields are required.
#[derive(Deserialize, Debug, Clone)]
pub struct AdviceSlip {
    pub id: u64,
    pub advice: String,
}

/// One entry of the book collection. Every field may be missing.
///
/// # Examples
///
/// ```
/// use dailydose_client::content::BookEntry;
///
/// let json = r#"{"title": "Chamber of Secrets", "pages": 251, "releaseDate": "Jul 2, 1998"}"#;
/// let book: BookEntry = serde_json::from_str(json).unwrap();
/// assert_eq!(book.title.as_deref(), Some("Chamber of Secrets"));
/// assert!(book.author.is_none());
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BookEntry {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Usually a number, occasionally text.
    pub pages: Option<Value>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    pub description: Option<String>,
}

/// Body of the quote endpoint.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuoteEntry {
    pub quote: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl QuoteEntry {
    pub fn is_empty(&self) -> bool {
        self.quote.is_none() && self.author.is_none() && self.kind.is_none()
    }
}

/// Body of the dog endpoint: `{"status": "success", "message": "<image url>"}`.
#[derive(Deserialize, Debug, Clone)]
pub struct DogImage {
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
struct Endpoints {
    advice: Url,
    books: Url,
    quotes: Url,
    dogs: Url,
}

impl Endpoints {
    fn parse(config: &EndpointConfig) -> Result<Self, AppError> {
        Ok(Self {
            advice: parse_endpoint(&config.advice)?,
            books: parse_endpoint(&config.books)?,
            quotes: parse_endpoint(&config.quotes)?,
            dogs: parse_endpoint(&config.dogs)?,
        })
    }

    fn url_for(&self, category: Category) -> &Url {
        match category {
            Category::Advice => &self.advice,
            Category::Book => &self.books,
            Category::Quote => &self.quotes,
            Category::Dog => &self.dogs,
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|_| AppError::InvalidUrl(raw.to_string()))
}

/// HTTP client for the four content endpoints.
///
/// Each fetch issues exactly one GET, bounded by the configured timeout, and
/// normalizes the body into a fixed-order record. Fields the upstream leaves
/// out are filled with their documented defaults; only a failed request, a
/// non-success status or a body of the wrong shape is an error.
///
/// # Examples
///
/// ```no_run
/// use dailydose_client::ContentClient;
/// use dailydose_core::{EndpointConfig, HttpConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ContentClient::new(&HttpConfig::default(), &EndpointConfig::default())?;
/// let advice = client.fetch_advice().await?;
/// println!("#{}: {}", advice.id, advice.text);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentClient {
    client: Client,
    endpoints: Endpoints,
    timeout_secs: u64,
}

impl ContentClient {
    /// Creates a client for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if an endpoint is not an absolute URL.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(http: &HttpConfig, endpoints: &EndpointConfig) -> Result<Self, AppError> {
        let endpoints = Endpoints::parse(endpoints)?;

        let client = Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(http.timeout())
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            endpoints,
            timeout_secs: http.timeout_secs,
        })
    }

    /// Fetches one record of the given category.
    pub async fn fetch(&self, category: Category) -> Result<Record, AppError> {
        Ok(match category {
            Category::Advice => Record::Advice(self.fetch_advice().await?),
            Category::Book => Record::Book(self.fetch_book().await?),
            Category::Quote => Record::Quote(self.fetch_quote().await?),
            Category::Dog => Record::Dog(self.fetch_dog().await?),
        })
    }

    pub async fn fetch_advice(&self) -> Result<AdviceRecord, AppError> {
        let resp: AdviceResponse = self.get_json(Category::Advice).await?;
        Ok(Self::into_advice_record(resp.slip, timestamp_now()))
    }

    /// Fetches the book collection and recommends one entry at random.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyResponse` if the collection is empty.
    pub async fn fetch_book(&self) -> Result<BookRecord, AppError> {
        let books: Vec<BookEntry> = self.get_json(Category::Book).await?;
        debug!("Received {} books", books.len());

        let entry = pick_book(&books, &mut rand::thread_rng())
            .cloned()
            .ok_or(AppError::EmptyResponse)?;
        Ok(Self::into_book_record(entry, timestamp_now()))
    }

    /// Fetches a random quote.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyResponse` if the body carries none of the
    /// quote fields.
    pub async fn fetch_quote(&self) -> Result<QuoteRecord, AppError> {
        let entry: QuoteEntry = self.get_json(Category::Quote).await?;
        if entry.is_empty() {
            return Err(AppError::EmptyResponse);
        }
        Ok(Self::into_quote_record(entry, timestamp_now()))
    }

    /// Fetches a random dog image and derives its breed label.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedPayload` unless the body reports
    /// `"status": "success"` together with an image URL.
    pub async fn fetch_dog(&self) -> Result<DogRecord, AppError> {
        let image: DogImage = self.get_json(Category::Dog).await?;
        Self::into_dog_record(image, timestamp_now())
    }

    /// Issues the GET for `category` and decodes the body as JSON.
    async fn get_json<T: DeserializeOwned>(&self, category: Category) -> Result<T, AppError> {
        let url = self.endpoints.url_for(category);
        debug!(category = %category, url = %url, "Requesting content");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Some upstreams label JSON as text/html, so decode the raw bytes.
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {}", e))
        } else {
            AppError::ClientError(e.to_string())
        }
    }

    pub fn into_advice_record(slip: AdviceSlip, captured_at: NaiveDateTime) -> AdviceRecord {
        AdviceRecord {
            id: slip.id,
            text: slip.advice,
            captured_at,
        }
    }

    /// Converts a book entry, substituting defaults for missing fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use dailydose_client::ContentClient;
    /// use dailydose_client::content::BookEntry;
    /// use dailydose_core::timestamp_now;
    ///
    /// let entry = BookEntry {
    ///     title: Some("Prisoner of Azkaban".to_string()),
    ///     ..BookEntry::default()
    /// };
    /// let record = ContentClient::into_book_record(entry, timestamp_now());
    ///
    /// assert_eq!(record.author, "Unknown");
    /// assert_eq!(record.pages, "Unknown");
    /// assert_eq!(record.description, "No description available.");
    /// ```
    pub fn into_book_record(entry: BookEntry, captured_at: NaiveDateTime) -> BookRecord {
        BookRecord {
            title: entry.title.unwrap_or_else(|| UNKNOWN.to_string()),
            author: entry.author.unwrap_or_else(|| UNKNOWN.to_string()),
            pages: value_as_text(entry.pages.as_ref()).unwrap_or_else(|| UNKNOWN.to_string()),
            release_date: entry.release_date.unwrap_or_else(|| UNKNOWN.to_string()),
            description: entry
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            captured_at,
        }
    }

    pub fn into_quote_record(entry: QuoteEntry, captured_at: NaiveDateTime) -> QuoteRecord {
        QuoteRecord {
            text: entry.quote.unwrap_or_else(|| NO_QUOTE.to_string()),
            author: entry.author.unwrap_or_else(|| ANONYMOUS.to_string()),
            category: entry.kind.unwrap_or_else(|| GENERAL.to_string()),
            captured_at,
        }
    }

    pub fn into_dog_record(
        image: DogImage,
        captured_at: NaiveDateTime,
    ) -> Result<DogRecord, AppError> {
        match (image.status.as_deref(), image.message) {
            (Some("success"), Some(image_url)) => Ok(DogRecord {
                breed: derive_breed_label(&image_url),
                image_url,
                captured_at,
            }),
            (Some("success"), None) => Err(AppError::UnexpectedPayload(
                "dog response has no image URL".to_string(),
            )),
            (status, _) => Err(AppError::UnexpectedPayload(format!(
                "dog API reported status {:?}",
                status.unwrap_or("missing")
            ))),
        }
    }
}

/// Picks one entry uniformly at random, `None` for an empty collection.
pub fn pick_book<'a, R: Rng + ?Sized>(books: &'a [BookEntry], rng: &mut R) -> Option<&'a BookEntry> {
    books.choose(rng)
}

/// Renders a scalar JSON value as text; `null` counts as missing.
fn value_as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
