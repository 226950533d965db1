pub mod movie;
pub mod party;
pub mod planner;
pub mod tmdb;

pub use movie::{
    CollectionStats, Movie, MovieCreate, MovieUpdate, RatingReviewUpdate, TmdbMovieAdd,
    WatchStatus, EPISODE_DURATION_MINUTES,
};
pub use party::{
    PartyJoinRequest, PartyLeaveRequest, PartyMember, PartyRoom, PartyRoomCreate, PartySyncRequest,
};
pub use planner::{
    Friend, Roster, RosterAction, RosterError, SlotTag, Timezone, WatchTimeSuggestion,
};
pub use tmdb::{
    genre_id, CatalogTitle, MediaType, TitleDetails, TmdbDetails, TmdbListItem, TmdbPage,
    MAX_SEARCH_RESULTS, MIN_GOOD_RATING, MIN_TOP_RATING,
};
