use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="page-overlay">
			<h1>"Page not found!"</h1>
		</div>
	}
}
