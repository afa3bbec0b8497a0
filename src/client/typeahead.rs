use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::debug;

use super::{api_client::CityApi, client_error::ClientError};
use crate::types::{city_records::SuggestionRecord, weather_payload::WeatherPayload};

pub const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeaheadState {
    Idle,
    Debouncing,
    Searching,
    Displayed,
}

#[derive(Debug)]
pub enum TypeaheadEvent {
    DebounceElapsed {
        seq: u64,
    },
    Results {
        seq: u64,
        suggestions: Vec<SuggestionRecord>,
    },
}

impl TypeaheadEvent {
    fn seq(&self) -> u64 {
        match self {
            TypeaheadEvent::DebounceElapsed { seq } | TypeaheadEvent::Results { seq, .. } => *seq,
        }
    }
}

pub struct TypeaheadClient<A: CityApi> {
    api: Arc<A>,
    debounce: Duration,
    input: String,
    /// Bumped on every keystroke. Events tagged with an older value are dropped.
    seq: u64,
    state: TypeaheadState,
    suggestions: Vec<SuggestionRecord>,
    pending: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<TypeaheadEvent>,
    events_rx: UnboundedReceiver<TypeaheadEvent>,
}

impl<A: CityApi> TypeaheadClient<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_debounce(api, DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<A>, debounce: Duration) -> Self {
        let (events_tx, events_rx) = unbounded_channel();

        Self {
            api,
            debounce,
            input: String::new(),
            seq: 0,
            state: TypeaheadState::Idle,
            suggestions: Vec::new(),
            pending: None,
            events_tx,
            events_rx,
        }
    }

    pub fn input_value(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> TypeaheadState {
        self.state
    }

    pub fn suggestions(&self) -> &[SuggestionRecord] {
        &self.suggestions
    }

    pub fn is_panel_visible(&self) -> bool {
        self.state == TypeaheadState::Displayed
    }

    /// Handles one input-change event.
    pub fn input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.invalidate();

        let query = self.input.trim().to_string();
        if query.is_empty() {
            return;
        }

        let seq = self.seq;
        let debounce = self.debounce;
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();

        self.state = TypeaheadState::Debouncing;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if events.send(TypeaheadEvent::DebounceElapsed { seq }).is_err() {
                return;
            }

            // Detached so that cancelling a later timer cannot cancel this search.
            tokio::spawn(async move {
                let suggestions = api.search(&query).await.unwrap_or_else(|e| {
                    debug!("Suggestions for {:?} failed: {}", query, e);
                    Vec::new()
                });
                let _ = events.send(TypeaheadEvent::Results { seq, suggestions });
            });
        }));
    }

    /// Waits for the next timer or search event and applies it. Returns the
    /// state afterwards, whether or not the event was stale.
    ///
    /// Never resolves while nothing is scheduled, so drive it from a
    /// `tokio::select!` alongside the input source.
    pub async fn next_event(&mut self) -> TypeaheadState {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
        self.state
    }

    fn apply(&mut self, event: TypeaheadEvent) {
        if event.seq() != self.seq {
            debug!("Discarding stale event {:?} (current seq {})", event, self.seq);
            return;
        }

        match event {
            TypeaheadEvent::DebounceElapsed { .. } => self.state = TypeaheadState::Searching,
            TypeaheadEvent::Results { suggestions, .. } if suggestions.is_empty() => self.hide(),
            TypeaheadEvent::Results { suggestions, .. } => {
                self.suggestions = suggestions;
                self.state = TypeaheadState::Displayed;
            }
        }
    }

    /// Picks a displayed suggestion and looks up its weather right away.
    pub async fn select(&mut self, index: usize) -> Result<WeatherPayload, ClientError> {
        let chosen = self
            .suggestions
            .get(index)
            .cloned()
            .ok_or(ClientError::NoSuchSuggestion(index))?;

        self.input = chosen.name.clone();
        self.invalidate();

        self.api.weather(&chosen.name).await
    }

    /// Enter key / search button.
    pub async fn submit(&mut self) -> Result<WeatherPayload, ClientError> {
        let city = self.input.trim().to_string();
        if city.is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        self.invalidate();

        self.api.weather(&city).await
    }

    /// Cancels the debounce timer, outdates everything in flight and hides
    /// the panel.
    fn invalidate(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.seq += 1;
        self.hide();
    }

    fn hide(&mut self) {
        self.suggestions.clear();
        self.state = TypeaheadState::Idle;
    }
}

impl<A: CityApi> Drop for TypeaheadClient<A> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::time::{sleep, timeout};

    use super::*;
    use crate::{
        types::weather_payload::CurrentWeather, utils::resilient_fetcher::FetchError,
    };

    const CITIES: [(&str, &str); 4] = [
        ("Delhi", "India"),
        ("Dhaka", "Bangladesh"),
        ("Denver", "United States"),
        ("Delft", "Netherlands"),
    ];

    #[derive(Default)]
    struct FakeApi {
        delays_ms: HashMap<&'static str, u64>,
        fail_search: bool,
        searches: Mutex<Vec<String>>,
        weather_lookups: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_delays(delays: &[(&'static str, u64)]) -> Self {
            Self {
                delays_ms: delays.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn searches(&self) -> Vec<String> {
            self.searches.lock().clone()
        }

        fn weather_lookups(&self) -> Vec<String> {
            self.weather_lookups.lock().clone()
        }
    }

    #[async_trait]
    impl CityApi for FakeApi {
        async fn search(&self, query: &str) -> Result<Vec<SuggestionRecord>, ClientError> {
            self.searches.lock().push(query.to_string());
            let delay = self.delays_ms.get(query).copied().unwrap_or(10);
            sleep(Duration::from_millis(delay)).await;

            if self.fail_search {
                return Err(ClientError::Fetch(FetchError::Network("offline".to_string())));
            }

            let query = query.to_lowercase();
            Ok(CITIES
                .iter()
                .filter(|(name, _)| name.to_lowercase().starts_with(&query))
                .map(|(name, country)| SuggestionRecord {
                    name: name.to_string(),
                    country: country.to_string(),
                    lat: 0.0,
                    lng: 0.0,
                })
                .collect())
        }

        async fn weather(&self, city: &str) -> Result<WeatherPayload, ClientError> {
            self.weather_lookups.lock().push(city.to_string());

            Ok(WeatherPayload {
                city: city.to_string(),
                country: "India".to_string(),
                latitude: 28.61,
                longitude: 77.23,
                current_weather: CurrentWeather {
                    temperature: 30.into(),
                    windspeed: 10.into(),
                    weathercode: 1.into(),
                    time: "2024-01-01T00:00".to_string(),
                    extra: Default::default(),
                },
            })
        }
    }

    /// Applies events until nothing has arrived for a while.
    async fn settle<A: CityApi>(client: &mut TypeaheadClient<A>) {
        while timeout(Duration::from_secs(5), client.next_event()).await.is_ok() {}
    }

    fn names(client: &TypeaheadClient<FakeApi>) -> Vec<&str> {
        client.suggestions().iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn idle_client_waits_for_input() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api.clone());

        assert!(timeout(Duration::from_secs(1), client.next_event()).await.is_err());
        assert_eq!(client.state(), TypeaheadState::Idle);
        assert!(api.searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn walks_through_the_states() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api);

        client.input("de");
        assert_eq!(client.state(), TypeaheadState::Debouncing);

        assert_eq!(client.next_event().await, TypeaheadState::Searching);
        assert_eq!(client.next_event().await, TypeaheadState::Displayed);
        assert!(client.is_panel_visible());
        assert_eq!(names(&client), vec!["Delhi", "Denver", "Delft"]);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_searches_only_the_last_query() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api.clone());

        client.input("d");
        sleep(Duration::from_millis(50)).await;
        client.input("de");
        sleep(Duration::from_millis(50)).await;
        client.input("del");
        settle(&mut client).await;

        assert_eq!(api.searches(), vec!["del"]);
        assert_eq!(names(&client), vec!["Delhi", "Delft"]);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_responses_never_replace_the_latest() {
        // "d" answers last, "del" first.
        let api = Arc::new(FakeApi::with_delays(&[("d", 900), ("de", 500), ("del", 100)]));
        let mut client = TypeaheadClient::new(api.clone());

        client.input("d");
        sleep(Duration::from_millis(250)).await;
        client.input("de");
        sleep(Duration::from_millis(250)).await;
        client.input("del");
        settle(&mut client).await;

        assert_eq!(api.searches(), vec!["d", "de", "del"]);
        assert_eq!(client.state(), TypeaheadState::Displayed);
        assert_eq!(names(&client), vec!["Delhi", "Delft"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_input_outdates_in_flight_searches() {
        let api = Arc::new(FakeApi::with_delays(&[("del", 300)]));
        let mut client = TypeaheadClient::new(api.clone());

        client.input("del");
        sleep(Duration::from_millis(250)).await;
        client.input("   ");
        assert_eq!(client.state(), TypeaheadState::Idle);

        settle(&mut client).await;

        assert_eq!(api.searches(), vec!["del"]);
        assert_eq!(client.state(), TypeaheadState::Idle);
        assert!(client.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn no_matches_hides_the_panel() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api);

        client.input("zz");
        settle(&mut client).await;

        assert_eq!(client.state(), TypeaheadState::Idle);
        assert!(!client.is_panel_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_degrades_to_an_empty_list() {
        let api = Arc::new(FakeApi {
            fail_search: true,
            ..FakeApi::default()
        });
        let mut client = TypeaheadClient::new(api.clone());

        client.input("de");
        settle(&mut client).await;

        assert_eq!(api.searches(), vec!["de"]);
        assert_eq!(client.state(), TypeaheadState::Idle);
        assert!(client.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_a_suggestion_fetches_weather_immediately() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api.clone());

        client.input("del");
        settle(&mut client).await;

        let payload = client.select(0).await.unwrap();

        assert_eq!(payload.city, "Delhi");
        assert_eq!(client.input_value(), "Delhi");
        assert!(!client.is_panel_visible());
        assert_eq!(api.weather_lookups(), vec!["Delhi"]);

        settle(&mut client).await;
        assert_eq!(api.searches(), vec!["del"]);
        assert_eq!(client.state(), TypeaheadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_past_the_list_is_an_error() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api.clone());

        let result = client.select(3).await;

        assert!(matches!(result, Err(ClientError::NoSuchSuggestion(3))));
        assert!(api.weather_lookups().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submitting_blank_input_is_rejected() {
        let api = Arc::new(FakeApi::default());
        let mut client = TypeaheadClient::new(api.clone());

        client.input("  ");
        let result = client.submit().await;

        assert!(matches!(result, Err(ClientError::EmptyQuery)));
        assert!(api.weather_lookups().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submitting_hides_suggestions_that_arrive_late() {
        let api = Arc::new(FakeApi::with_delays(&[("delhi", 300)]));
        let mut client = TypeaheadClient::new(api.clone());

        client.input("delhi");
        sleep(Duration::from_millis(250)).await;
        let payload = client.submit().await.unwrap();
        settle(&mut client).await;

        assert_eq!(payload.city, "delhi");
        assert_eq!(api.searches(), vec!["delhi"]);
        assert_eq!(client.state(), TypeaheadState::Idle);
        assert!(client.suggestions().is_empty());
    }
}
