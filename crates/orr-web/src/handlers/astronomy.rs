//! Public astrophotography gallery and observation log.

use axum::extract::{Path, Query, State};
use orr_core::entities::{AstroPhoto, EclipseObservation, ObservationLog};
use orr_core::enums::ObjectType;
use orr_core::pagination::Page;
use serde::{Deserialize, Serialize};

use super::{choice_param, empty_page};
use crate::error::WebResult;
use crate::json::Json;
use crate::state::AppState;

const RELATED_OBSERVATIONS: u64 = 3;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryPage {
    pub photos: Page<AstroPhoto>,
    pub object_type: Option<ObjectType>,
}

/// GET /astronomy/
pub async fn gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> WebResult<Json<GalleryPage>> {
    let per_page = state.config.general.page_size_gallery;
    let Ok(object_type) = choice_param::<ObjectType>(query.kind.as_deref()) else {
        return Ok(Json(GalleryPage {
            photos: empty_page(per_page),
            object_type: None,
        }));
    };

    let photos = state
        .service
        .page_gallery(object_type, per_page, query.page.as_deref())
        .await?;
    Ok(Json(GalleryPage {
        photos,
        object_type,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET /astronomy/observations/
pub async fn observation_list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> WebResult<Json<Page<ObservationLog>>> {
    let page = state
        .service
        .page_public_observations(
            state.config.general.page_size_observations,
            query.page.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

#[derive(Debug, Serialize)]
pub struct ObservationDetailPage {
    pub observation: ObservationLog,
    pub photos: Vec<AstroPhoto>,
    pub eclipse: Option<EclipseObservation>,
    pub related_observations: Vec<ObservationLog>,
}

/// GET /astronomy/observations/{slug}/
pub async fn observation_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> WebResult<Json<ObservationDetailPage>> {
    let svc = &state.service;
    let observation = svc.get_public_observation_by_slug(&slug).await?;
    let photos = svc.photos_for_observation(&observation.id).await?;
    let eclipse = svc.eclipse_for_observation(&observation.id).await?;
    let related_observations = svc
        .related_observations(&observation, RELATED_OBSERVATIONS)
        .await?;

    Ok(Json(ObservationDetailPage {
        observation,
        photos,
        eclipse,
        related_observations,
    }))
}
