use crate::api::AdminApi;
use crate::config::ConsoleSettings;
use crate::errors::{AppError, AppResult};
use crate::export::{render_workbook, sanitize_export_file_name, ExportSink};
use crate::filter::{filter_by_query, FilterState};
use crate::models::{
    Buyer, DashboardFigures, ExportResponse, PaymentStatus, Record, RegistrationSummary, ToggleOutcome, ViewPage,
};
use crate::mutation::MutationController;
use crate::notify::{Notifier, EXPORT_FAILURE_MESSAGE, LOAD_FAILURE_MESSAGE};
use crate::paginator::Paginator;
use crate::store::RecordStore;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, RwLock as StdRwLock};

#[derive(Debug, Clone)]
struct ViewState {
    filter: FilterState,
    paginator: Paginator,
}

pub struct RegistrantConsole {
    event_id: StdRwLock<String>,
    store: Arc<RecordStore>,
    view: StdMutex<ViewState>,
    mutations: MutationController,
    api: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn ExportSink>,
    export_file_name: String,
}

impl RegistrantConsole {
    pub fn new(
        event_id: impl Into<String>,
        api: Arc<dyn AdminApi>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn ExportSink>,
        settings: &ConsoleSettings,
    ) -> Self {
        let store = Arc::new(RecordStore::new());
        let mutations = MutationController::new(store.clone(), api.clone(), notifier.clone());
        Self {
            event_id: StdRwLock::new(event_id.into()),
            store,
            view: StdMutex::new(ViewState {
                filter: FilterState::default(),
                paginator: Paginator::new(settings.page_size),
            }),
            mutations,
            api,
            notifier,
            sink,
            export_file_name: sanitize_export_file_name(&settings.export_file_name),
        }
    }

    pub fn event_id(&self) -> AppResult<String> {
        self.event_id
            .read()
            .map(|event_id| event_id.clone())
            .map_err(|_| AppError::Internal("event id lock poisoned".to_string()))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn load(&self, records: Vec<Record>) -> AppResult<()> {
        let mut view = self.lock_view()?;
        self.store.load(records)?;
        let total = self.match_count(&view.filter)?;
        view.paginator.clamp(total);
        Ok(())
    }

    pub async fn refresh(&self) -> AppResult<usize> {
        let event_id = self.event_id()?;
        let records = self.fetch_registrants(&event_id).await?;
        let count = records.len();
        if let Err(error) = self.load(records) {
            self.notifier.notify_error(LOAD_FAILURE_MESSAGE);
            return Err(error);
        }
        tracing::info!(event_id = %event_id, count, "registrants refreshed");
        Ok(count)
    }

    // The current event and snapshot stay in place until the new event's registrants arrive.
    pub async fn set_event(&self, event_id: impl Into<String>) -> AppResult<usize> {
        let event_id = event_id.into();
        let records = self.fetch_registrants(&event_id).await?;
        let count = records.len();
        {
            let mut view = self.lock_view()?;
            let mut current = self
                .event_id
                .write()
                .map_err(|_| AppError::Internal("event id lock poisoned".to_string()))?;
            if let Err(error) = self.store.load(records) {
                self.notifier.notify_error(LOAD_FAILURE_MESSAGE);
                return Err(error);
            }
            *current = event_id.clone();
            view.filter.clear();
            view.paginator.reset();
        }
        tracing::info!(event_id = %event_id, count, "switched event");
        Ok(count)
    }

    pub fn set_query(&self, query: impl Into<String>) -> AppResult<ViewPage<Record>> {
        let mut view = self.lock_view()?;
        view.filter.set_query(query);
        let total = self.match_count(&view.filter)?;
        view.paginator.clamp(total);
        self.project(&view)
    }

    pub fn set_categorical_filter(&self, status: PaymentStatus) -> AppResult<Option<PaymentStatus>> {
        let mut view = self.lock_view()?;
        let active = view.filter.toggle_category(status);
        let total = self.match_count(&view.filter)?;
        view.paginator.clamp(total);
        Ok(active)
    }

    pub fn clear_filters(&self) -> AppResult<()> {
        let mut view = self.lock_view()?;
        view.filter.clear();
        let total = self.match_count(&view.filter)?;
        view.paginator.clamp(total);
        Ok(())
    }

    pub fn next(&self) -> AppResult<bool> {
        let mut view = self.lock_view()?;
        let total = self.match_count(&view.filter)?;
        Ok(view.paginator.next(total))
    }

    pub fn prev(&self) -> AppResult<bool> {
        Ok(self.lock_view()?.paginator.prev())
    }

    pub fn go_to(&self, page: usize) -> AppResult<usize> {
        let mut view = self.lock_view()?;
        let total = self.match_count(&view.filter)?;
        Ok(view.paginator.go_to(page, total))
    }

    pub fn view(&self) -> AppResult<ViewPage<Record>> {
        let view = self.lock_view()?;
        self.project(&view)
    }

    pub async fn toggle_flag(&self, record_id: &str) -> AppResult<ToggleOutcome> {
        let event_id = self.event_id()?;
        self.mutations.toggle_flag(&event_id, record_id).await
    }

    pub fn is_pending(&self, record_id: &str) -> bool {
        self.mutations.in_flight().is_pending(record_id)
    }

    pub fn export_all(&self) -> AppResult<ExportResponse> {
        let records = self.store.get()?;
        let delivered = render_workbook(&records)
            .and_then(|bytes| self.sink.deliver(&bytes, &self.export_file_name));

        match delivered {
            Ok(path) => {
                tracing::info!(rows = records.len(), path = %path, "registrants exported");
                Ok(ExportResponse {
                    path,
                    file_name: self.export_file_name.clone(),
                    row_count: records.len(),
                })
            }
            Err(error) => {
                tracing::error!(error = %error, "registrant export failed");
                self.notifier.notify_error(EXPORT_FAILURE_MESSAGE);
                Err(match error {
                    AppError::Export(_) => error,
                    other => AppError::Export(other.to_string()),
                })
            }
        }
    }

    pub fn summary(&self) -> AppResult<RegistrationSummary> {
        let records = self.store.get()?;
        Ok(summarize(&records))
    }

    pub async fn dashboard(&self) -> AppResult<DashboardFigures> {
        let event_id = self.event_id()?;
        self.api.fetch_dashboard(&event_id).await
    }

    async fn fetch_registrants(&self, event_id: &str) -> AppResult<Vec<Record>> {
        self.api.fetch_registrants(event_id).await.map_err(|error| {
            tracing::error!(event_id, error = %error, "failed to fetch registrants");
            self.notifier.notify_error(LOAD_FAILURE_MESSAGE);
            error
        })
    }

    fn lock_view(&self) -> AppResult<MutexGuard<'_, ViewState>> {
        self.view
            .lock()
            .map_err(|_| AppError::Internal("view state mutex poisoned".to_string()))
    }

    fn match_count(&self, filter: &FilterState) -> AppResult<usize> {
        let records = self.store.get()?;
        Ok(records.iter().filter(|record| filter.matches(record)).count())
    }

    fn project(&self, view: &ViewState) -> AppResult<ViewPage<Record>> {
        let records = self.store.get()?;
        let matches = view.filter.view_set(&records);
        Ok(ViewPage {
            rows: view.paginator.current(&matches).to_vec(),
            page_count: view.paginator.page_count(matches.len()),
            current_page: view.paginator.current_page(),
            total_matches: matches.len(),
            show_pagination: view.paginator.shows_controls(matches.len()),
            pending_ids: self.mutations.in_flight().pending_ids(),
        })
    }
}

pub fn summarize(records: &[Record]) -> RegistrationSummary {
    records.iter().fold(
        RegistrationSummary {
            total: records.len(),
            ..RegistrationSummary::default()
        },
        |mut summary, record| {
            match record.payment_status {
                PaymentStatus::Completed => summary.completed += 1,
                PaymentStatus::Pending => summary.pending += 1,
                PaymentStatus::Free => summary.free += 1,
            }
            if record.credentialed {
                summary.credentialed += 1;
            }
            summary
        },
    )
}

#[derive(Debug, Clone)]
pub struct BuyerList {
    product_id: String,
    buyers: Vec<Buyer>,
    query: String,
    paginator: Paginator,
}

impl BuyerList {
    pub fn new(product_id: impl Into<String>, page_size: usize) -> Self {
        Self {
            product_id: product_id.into(),
            buyers: Vec::new(),
            query: String::new(),
            paginator: Paginator::new(page_size),
        }
    }

    pub async fn fetch(api: &dyn AdminApi, product_id: &str, page_size: usize) -> AppResult<Self> {
        let mut list = Self::new(product_id, page_size);
        let buyers = api.fetch_product_buyers(product_id).await.map_err(|error| {
            tracing::error!(product_id, error = %error, "failed to fetch product buyers");
            error
        })?;
        list.load(buyers);
        Ok(list)
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn load(&mut self, buyers: Vec<Buyer>) {
        self.buyers = buyers;
        let total = self.matches().len();
        self.paginator.clamp(total);
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> ViewPage<Buyer> {
        self.query = query.into();
        let total = self.matches().len();
        self.paginator.clamp(total);
        self.view()
    }

    pub fn next(&mut self) -> bool {
        let total = self.matches().len();
        self.paginator.next(total)
    }

    pub fn prev(&mut self) -> bool {
        self.paginator.prev()
    }

    pub fn go_to(&mut self, page: usize) -> usize {
        let total = self.matches().len();
        self.paginator.go_to(page, total)
    }

    pub fn view(&self) -> ViewPage<Buyer> {
        let matches = self.matches();
        ViewPage {
            rows: self.paginator.current(&matches).to_vec(),
            page_count: self.paginator.page_count(matches.len()),
            current_page: self.paginator.current_page(),
            total_matches: matches.len(),
            show_pagination: self.paginator.shows_controls(matches.len()),
            pending_ids: Vec::new(),
        }
    }

    fn matches(&self) -> Vec<Buyer> {
        filter_by_query(&self.buyers, &self.query)
    }
}
