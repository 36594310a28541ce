//! Page handlers - the interactive form
//!
//! Every outcome, failures included, is rendered back into the page with
//! 200 so the user can correct the input and try again.

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};

use crate::models::{collect, PredictionForm};
use crate::render::{self, Outcome};
use crate::AppState;

/// Initial page, every control at its default
pub async fn index() -> Html<String> {
    Html(render::page(&PredictionForm::default(), None))
}

/// Re-render the page with the submitted values echoed back, no prediction
pub async fn preview(form: Result<Form<PredictionForm>, FormRejection>) -> Html<String> {
    match form {
        Ok(Form(form)) => {
            let outcome = collect(&form).err().map(|e| Outcome::Error(e.message()));
            Html(render::page(&form, outcome.as_ref()))
        }
        Err(rejection) => rejected(rejection),
    }
}

/// Assemble, echo and predict
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictionForm>, FormRejection>,
) -> Html<String> {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return rejected(rejection),
    };

    let outcome = match collect(&form) {
        Ok(record) => match state.pipeline.predict_async(record).await {
            Ok(prediction) => {
                tracing::info!("Predicted creep strain: {:.4}", prediction.value);
                Outcome::Success(prediction)
            }
            Err(failure) => {
                tracing::warn!("Prediction failed: {}", failure);
                Outcome::Error(failure.to_string())
            }
        },
        Err(e) => Outcome::Error(e.message()),
    };

    Html(render::page(&form, Some(&outcome)))
}

fn rejected(rejection: FormRejection) -> Html<String> {
    tracing::debug!("Form rejected: {}", rejection.body_text());
    let outcome = Outcome::Error(rejection.body_text());
    Html(render::page(&PredictionForm::default(), Some(&outcome)))
}
