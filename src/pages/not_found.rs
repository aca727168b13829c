use leptos::prelude::*;

/// 404 page for unknown routes.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<a href="/">"Back to the Evidence Explorer"</a>
		</div>
	}
}
