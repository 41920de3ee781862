//! 线索分析页面
//!
//! 图表渲染不在范围内：分布以比例条呈现，数字说话。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::format::format_inr;
use nexcrm_shared::{DistributionBucket, LeadAnalytics, LeadSource, LeadStatus};

use crate::auth::{expire_session, use_auth};
use crate::components::icons::*;
use crate::web::console;

/// `_id` 桶键转界面标签（snake_case 值与枚举一致）
fn bucket_label(key: &str, of_status: bool) -> String {
    if of_status {
        LeadStatus::from_value(key).label().to_string()
    } else {
        LeadSource::from_value(key).label().to_string()
    }
}

#[component]
fn DistributionCard(
    title: &'static str,
    of_status: bool,
    buckets: Signal<Vec<DistributionBucket>>,
) -> impl IntoView {
    let total = move || buckets.with(|b| b.iter().map(|bucket| bucket.count).sum::<u32>()).max(1);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title text-base">{title}</h3>
                <Show when=move || buckets.with(|b| b.is_empty())>
                    <p class="text-sm text-base-content/50 py-4">"No data yet."</p>
                </Show>
                {move || {
                    buckets
                        .get()
                        .into_iter()
                        .map(|bucket| {
                            let share = bucket.count * 100 / total();
                            view! {
                                <div class="py-1">
                                    <div class="flex justify-between text-sm">
                                        <span>{bucket_label(&bucket.key, of_status)}</span>
                                        <span class="opacity-60">
                                            {format!("{} ({share}%)", bucket.count)}
                                        </span>
                                    </div>
                                    <progress
                                        class="progress progress-primary w-full"
                                        value=share
                                        max="100"
                                    ></progress>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let analytics = RwSignal::new(LeadAnalytics::default());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    Effect::new(move |_| {
        let state = auth_state.get();
        if state.is_loading || !state.is_authenticated() {
            return;
        }
        let api = state.api();
        set_loading.set(true);
        spawn_local(async move {
            match api.lead_analytics().await {
                Ok(data) => {
                    analytics.set(data);
                    set_error_msg.set(None);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    console::error(&format!("[analytics] Fetch failed: {err}"));
                    set_error_msg.set(Some(format!("Failed to load analytics: {err}")));
                }
            }
            set_loading.set(false);
        });
    });

    let status_buckets = Signal::derive(move || analytics.get().status_distribution);
    let source_buckets = Signal::derive(move || analytics.get().source_distribution);
    let avg_deal = move || {
        let data = analytics.get();
        if data.won_leads == 0 {
            0.0
        } else {
            data.won_value / data.won_leads as f64
        }
    };

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            <div>
                <h1 class="text-2xl font-bold">"Analytics"</h1>
                <p class="text-base-content/70">"Pipeline performance at a glance"</p>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| {
                    view! {
                        <div class="py-12 text-center">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                }
            >
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-figure text-primary">
                            <IndianRupee attr:class="h-8 w-8" />
                        </div>
                        <div class="stat-title">"Pipeline Value"</div>
                        <div class="stat-value text-primary text-2xl">
                            {move || format_inr(analytics.get().total_value)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-figure text-success">
                            <TrendingUp attr:class="h-8 w-8" />
                        </div>
                        <div class="stat-title">"Won Value"</div>
                        <div class="stat-value text-success text-2xl">
                            {move || format_inr(analytics.get().won_value)}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Conversion Rate"</div>
                        <div class="stat-value text-secondary">
                            {move || format!("{:.1}%", analytics.get().conversion_rate)}
                        </div>
                        <div class="stat-desc">
                            {move || {
                                format!(
                                    "{} won / {} lost",
                                    analytics.get().won_leads,
                                    analytics.get().lost_leads,
                                )
                            }}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-figure text-accent">
                            <BarChart3 attr:class="h-8 w-8" />
                        </div>
                        <div class="stat-title">"Total Leads"</div>
                        <div class="stat-value text-accent">
                            {move || analytics.get().total_leads}
                        </div>
                        <div class="stat-desc">
                            {move || format!("avg deal {}", format_inr(avg_deal()))}
                        </div>
                    </div>
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    <DistributionCard
                        title="Pipeline by Stage"
                        of_status=true
                        buckets=status_buckets
                    />
                    <DistributionCard
                        title="Leads by Source"
                        of_status=false
                        buckets=source_buckets
                    />
                </div>
            </Show>
        </div>
    }
}
