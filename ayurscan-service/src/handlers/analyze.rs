use crate::models::{AnalysisDocument, AnalysisRequest, AnalyzeRequest};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

/// `POST /api/analyze`
///
/// The credential is checked before the body is looked at. A body sent
/// without a JSON content type is treated as empty.
pub async fn analyze_food(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisDocument>, AppError> {
    state.analyzer.ensure_configured()?;

    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => AnalyzeRequest::default(),
        Err(rejection) => {
            return Err(AppError::PayloadRejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })
        }
    };

    let request = AnalysisRequest::try_from(body)?;

    tracing::info!(
        media_type = %request.media_type,
        image_len = request.image_data.len(),
        "Analyzing food image"
    );

    let document = state.analyzer.analyze(request).await?;

    Ok(Json(document))
}
