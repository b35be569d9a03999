//! Menu population: one listing per candidate family, fanned out with a
//! bounded number of tool invocations in flight.
//!
//! Handles messages: `Refresh`, `MenuPopulated`

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use futures_util::stream;
use log::{debug, info, warn};
use std::sync::Arc;

use iced::Task;

use sdkui_backend::VersionManager;

use crate::backend_kind::BackendKind;
use crate::message::Message;
use crate::registry::FamilyListing;

use super::SdkUi;

/// List every candidate of every manager. Families come back in manager
/// order, then candidate order; a failed listing becomes an empty family.
pub(super) async fn populate(
    managers: Vec<(BackendKind, Arc<dyn VersionManager>)>,
    concurrency: usize,
) -> Vec<FamilyListing> {
    let mut jobs = Vec::new();
    for (backend, manager) in managers {
        match manager.candidates().await {
            Ok(candidates) => {
                debug!("{backend}: {} candidate(s)", candidates.len());
                jobs.extend(
                    candidates
                        .into_iter()
                        .map(|candidate| (backend, Arc::clone(&manager), candidate)),
                );
            }
            Err(e) => warn!("{backend}: could not list candidates: {e}"),
        }
    }

    let listings: Vec<BoxFuture<'static, FamilyListing>> = jobs
        .into_iter()
        .map(|(backend, manager, candidate)| {
            async move {
                let versions = match manager.sorted_versions(&candidate).await {
                    Ok(versions) => versions,
                    Err(e) => {
                        warn!("{backend}: listing {candidate} failed: {e}");
                        Vec::new()
                    }
                };
                FamilyListing {
                    backend,
                    candidate,
                    versions,
                }
            }
            .boxed()
        })
        .collect();

    stream::iter(listings)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

impl SdkUi {
    pub(super) fn start_population(&mut self) -> Task<Message> {
        if self.populating {
            debug!("Menu population already running");
            return Task::none();
        }
        self.populating = true;

        let managers = self.managers.clone();
        let concurrency = self.settings.listing_concurrency;
        Task::perform(populate(managers, concurrency), Message::MenuPopulated)
    }

    pub(super) fn handle_menu_populated(&mut self, families: Vec<FamilyListing>) -> Task<Message> {
        self.populating = false;
        info!(
            "Menu populated: {} families, {} versions",
            families.len(),
            families.iter().map(|f| f.versions.len()).sum::<usize>()
        );
        self.registry.replace(families);
        self.refresh_menu();
        Task::none()
    }
}
