use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, astronomy, blog, finance, portfolio, research};
use crate::state::AppState;

/// Every route the site serves.
///
/// Public:
/// - `GET /`, `GET /about/`, `POST /contact/`
/// - `GET /projects/`, `GET /projects/:slug/`
/// - `GET /blog/`, `GET /blog/:slug/`
/// - `GET /astronomy/`, `GET /astronomy/observations/`, `GET /astronomy/observations/:slug/`
/// - `POST /login/`, `POST /logout/`
///
/// Everything else needs a session cookie.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(portfolio::home))
        .route("/about/", get(portfolio::about))
        .route("/contact/", post(portfolio::contact))
        .route("/projects/", get(portfolio::project_list))
        .route("/projects/:slug/", get(portfolio::project_detail))
        .route("/blog/", get(blog::post_list))
        .route("/blog/:slug/", get(blog::post_detail))
        .route("/astronomy/", get(astronomy::gallery))
        .route("/astronomy/observations/", get(astronomy::observation_list))
        .route(
            "/astronomy/observations/:slug/",
            get(astronomy::observation_detail),
        )
        .route("/login/", post(accounts::login))
        .route("/logout/", post(accounts::logout))
        .route("/dashboard/", get(accounts::dashboard));

    let research = Router::new()
        .route("/research/", get(research::dashboard))
        .route(
            "/research/projects/",
            get(research::project_list).post(research::project_create),
        )
        .route("/research/projects/export-csv/", get(research::export_csv))
        .route("/research/projects/:slug/", get(research::project_detail))
        .route("/research/projects/:slug/edit/", post(research::project_edit))
        .route(
            "/research/projects/:slug/delete/",
            post(research::project_delete),
        )
        .route("/research/astronomy/", get(research::astro_list))
        .route("/research/astronomy/:slug/", get(research::astro_detail))
        .route(
            "/research/astronomy/:slug/entries/",
            post(research::astro_add_entry),
        );

    let finance = Router::new()
        .route("/finance/", get(finance::dashboard))
        .route("/finance/transactions/", get(finance::transaction_list))
        .route("/finance/transactions/add/", post(finance::transaction_add))
        .route(
            "/finance/transactions/:id/edit/",
            post(finance::transaction_edit),
        )
        .route(
            "/finance/transactions/:id/delete/",
            post(finance::transaction_delete),
        )
        .route(
            "/finance/categories/",
            get(finance::category_list).post(finance::category_create),
        )
        .route(
            "/finance/budgets/",
            get(finance::budget_list).post(finance::budget_create),
        )
        .route(
            "/finance/research/",
            get(finance::research_expense_list).post(finance::research_expense_create),
        );

    public
        .merge(research)
        .merge(finance)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
