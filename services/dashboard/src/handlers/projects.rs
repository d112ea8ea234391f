//! Project Explorer Handler
//!
//! Project listing and linked bills of materials.

use axum::{
    extract::{Path, State},
    response::{Json, Response},
};
use mechbi_models::{LinkedBom, ProjectBomView};
use mechbi_utils::analytics::project_view;
use mechbi_utils::export::bom_to_csv;
use mechbi_utils::workbook::BomLinker;
use mechbi_utils::{DashboardError, Snapshot};
use serde::Serialize;

use super::{csv_response, current_snapshot};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProjectBomResponse {
    #[serde(flatten)]
    pub view: ProjectBomView,
    pub lines: LinkedBom,
}

fn link(state: &AppState, snapshot: &Snapshot, project: &str) -> ApiResult<LinkedBom> {
    let data = &snapshot.data;
    Ok(state
        .store
        .linker()
        .link_project(project, &data.projects, &data.components, &data.schema)?)
}

/// GET /api/v1/projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let snapshot = current_snapshot(&state)?;
    let data = &snapshot.data;
    if data.projects.is_empty() {
        return Err(DashboardError::data_missing("'Projects Considered' sheet not found").into());
    }
    Ok(Json(BomLinker::list_projects(&data.projects, &data.schema.projects)))
}

/// GET /api/v1/projects/:name/bom
pub async fn get_project_bom(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ProjectBomResponse>> {
    let snapshot = current_snapshot(&state)?;
    let bom = link(&state, &snapshot, &name)?;
    let view = project_view(&name, &bom, &snapshot.data.schema.components);
    Ok(Json(ProjectBomResponse { view, lines: bom }))
}

/// GET /api/v1/projects/:name/bom/export
pub async fn export_project_bom(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let snapshot = current_snapshot(&state)?;
    let bom = link(&state, &snapshot, &name)?;
    let body = bom_to_csv(&bom)?;
    Ok(csv_response(&format!("{}-bom.csv", name), body))
}
