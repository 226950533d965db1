use serde::{Deserialize, Serialize};

/// Titles with a rating at or above this count as "good"
pub const MIN_GOOD_RATING: f64 = 7.0;
/// Titles with a rating at or above this count as "top rated"
pub const MIN_TOP_RATING: f64 = 8.0;
/// Search responses are capped to this many entries for faster rendering
pub const MAX_SEARCH_RESULTS: usize = 3;

/// Whether a catalog entry is a movie or a TV show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

/// A catalog entry shaped for clients: poster paths resolved to full URLs,
/// movie/TV differences already normalized away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogTitle {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub media_type: MediaType,
    pub vote_average: Option<f64>,
    pub is_tv_show: bool,
    #[serde(default)]
    pub popularity: f64,
}

/// Full details for one title, used when importing into the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleDetails {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub total_episodes: Option<i64>,
    pub number_of_seasons: Option<i64>,
    pub total_minutes: Option<i64>,
}

/// TMDB genre name → genre ID, per the v3 API
pub fn genre_id(name: &str) -> Option<i32> {
    let id = match name {
        "Action" => 28,
        "Adventure" => 12,
        "Animation" => 16,
        "Comedy" => 35,
        "Crime" => 80,
        "Documentary" => 99,
        "Drama" => 18,
        "Family" => 10751,
        "Fantasy" => 14,
        "History" => 36,
        "Horror" => 27,
        "Music" => 10402,
        "Mystery" => 9648,
        "Romance" => 10749,
        "Science Fiction" => 878,
        "TV Movie" => 10770,
        "Thriller" => 53,
        "War" => 10752,
        "Western" => 37,
        _ => return None,
    };
    Some(id)
}

// ============================================================================
// Raw TMDB wire types
// ============================================================================

/// Paged list response wrapper shared by search and discover endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One entry from /search/multi, /movie/popular, /discover/..., etc.
///
/// Movies carry `title`/`release_date`, TV shows carry `name` /
/// `first_air_date`; both shapes deserialize into this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl TmdbListItem {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    pub fn date(&self) -> Option<String> {
        self.release_date
            .clone()
            .or_else(|| self.first_air_date.clone())
    }
}

/// Details response from /movie/{id} or /tv/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub created_by: Vec<TmdbCreator>,
    #[serde(default)]
    pub number_of_episodes: Option<i64>,
    #[serde(default)]
    pub number_of_seasons: Option<i64>,
    #[serde(default)]
    pub runtime: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCreator {
    pub name: String,
}
