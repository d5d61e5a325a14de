//! [`RoutingSession`]: one annotated network plus the selected weather.

use log::{debug, info};

use sr_core::{RiskTable, RoutingConfig, WeatherCondition};
use sr_risk::RiskTableStore;
use sr_spatial::{AStarRouter, CostAnnotator, CostCriterion, Endpoint, Geocoder, RoadNetwork, Route, Router};

use crate::{SessionError, SessionResult};

/// Safest and fastest route between the same endpoints under one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteComparison {
    pub condition: WeatherCondition,
    /// Minimum-risk route.
    pub safest: Route,
    /// Minimum-time route.
    pub fastest: Route,
    pub safest_minutes: f64,
    pub fastest_minutes: f64,
}

impl RouteComparison {
    /// Whether both criteria chose the same node sequence.
    pub fn same_path(&self) -> bool {
        self.safest.nodes == self.fastest.nodes
    }

    /// Minutes the safest route adds over the fastest one.
    pub fn extra_minutes(&self) -> f64 {
        self.safest_minutes - self.fastest_minutes
    }
}

/// Owns a road network, keeps it annotated for the current weather, and
/// answers route queries against it.
///
/// Distance and time queries work before any weather is selected (the
/// network carries neutral costs); risk queries need
/// [`set_weather`](Self::set_weather) or [`set_risk_table`](Self::set_risk_table)
/// first.
pub struct RoutingSession<R: Router = AStarRouter> {
    network:   RoadNetwork,
    store:     RiskTableStore,
    config:    RoutingConfig,
    annotator: CostAnnotator,
    router:    R,
    geocoder:  Option<Box<dyn Geocoder>>,
}

impl RoutingSession<AStarRouter> {
    /// Session over `network` with the default A* router.
    ///
    /// # Errors
    ///
    /// [`SessionError::Core`] if `config` fails validation.
    pub fn new(network: RoadNetwork, store: RiskTableStore, config: RoutingConfig) -> SessionResult<Self> {
        Self::with_router(network, store, config, AStarRouter)
    }
}

impl<R: Router> RoutingSession<R> {
    pub fn with_router(
        network: RoadNetwork,
        store:   RiskTableStore,
        config:  RoutingConfig,
        router:  R,
    ) -> SessionResult<Self> {
        config.validate()?;
        let annotator = CostAnnotator::from_config(&config);
        Ok(Self { network, store, config, annotator, router, geocoder: None })
    }

    /// Resolve [`Endpoint::Place`] endpoints with `geocoder`.
    pub fn geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn store(&self) -> &RiskTableStore {
        &self.store
    }

    /// Condition the network is currently annotated for.
    pub fn weather(&self) -> Option<&WeatherCondition> {
        self.network.annotated_for()
    }

    /// Load `condition`'s risk table from the store and re-annotate.
    ///
    /// Selecting the current condition again reloads and re-annotates, which
    /// leaves the costs unchanged.
    ///
    /// # Errors
    ///
    /// [`SessionError::Risk`] wrapping `RiskError::MissingTable` when no
    /// table was produced for `condition`.  The previous annotation is kept.
    pub fn set_weather(&mut self, condition: WeatherCondition) -> SessionResult<()> {
        let table = self.store.load(&condition)?;
        info!("weather set to {:?} ({} scored roads)", condition.label(), table.len());
        self.set_risk_table(&table);
        Ok(())
    }

    /// Annotate with an in-memory table, bypassing the store.
    pub fn set_risk_table(&mut self, table: &RiskTable) {
        self.annotator.annotate(&mut self.network, table);
    }

    /// Route between two endpoints under `criterion`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoWeather`] for a risk query before any weather was
    /// selected; [`SessionError::Spatial`] for snapping, geocoding and
    /// unreachable destinations.
    pub fn route(
        &self,
        origin: &Endpoint,
        destination: &Endpoint,
        criterion: CostCriterion,
    ) -> SessionResult<Route> {
        if criterion == CostCriterion::Risk && self.weather().is_none() {
            return Err(SessionError::NoWeather);
        }
        let route = self
            .router
            .route_points(&self.network, origin, destination, criterion, self.geocoder.as_deref())?;
        debug!(
            "{criterion} route: {} edges, total {:.3}",
            route.edges.len(),
            route.total_cost
        );
        Ok(route)
    }

    /// Safest (risk) and fastest (time) routes for the current weather.
    pub fn compare(&self, origin: &Endpoint, destination: &Endpoint) -> SessionResult<RouteComparison> {
        let condition = self.weather().cloned().ok_or(SessionError::NoWeather)?;

        #[cfg(not(feature = "parallel"))]
        let (safest, fastest) = (
            self.route(origin, destination, CostCriterion::Risk),
            self.route(origin, destination, CostCriterion::Time),
        );

        #[cfg(feature = "parallel")]
        let (safest, fastest) = rayon::join(
            || self.route(origin, destination, CostCriterion::Risk),
            || self.route(origin, destination, CostCriterion::Time),
        );

        let (safest, fastest) = (safest?, fastest?);
        let safest_minutes = safest.travel_minutes(&self.network);
        let fastest_minutes = fastest.travel_minutes(&self.network);
        info!(
            "{:?}: safest {safest_minutes:.1} min over {} edges, fastest {fastest_minutes:.1} min over {} edges",
            condition.label(),
            safest.edges.len(),
            fastest.edges.len()
        );
        Ok(RouteComparison { condition, safest, fastest, safest_minutes, fastest_minutes })
    }
}
