use yew::prelude::*;

use crate::aggregate::{conic_gradient, pie_segments, MonthTotals};
use crate::format::format_currency;

#[derive(Properties, PartialEq)]
pub struct PieChartProps {
    pub title: &'static str,
    /// `(category name, amount)` in category list order.
    pub data: Vec<(String, i64)>,
    pub total: i64,
    pub currency_symbol: String,
}

#[function_component(PieChart)]
pub fn pie_chart(props: &PieChartProps) -> Html {
    let segments = pie_segments(props.data.clone(), props.total);

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <h3 class="font-bold text-foreground text-lg mb-4">{ props.title }</h3>
            {
                match conic_gradient(&segments) {
                    None => html! {
                        <div class="h-40 flex items-center justify-center text-sm text-muted-foreground">
                            {"데이터 없음"}
                        </div>
                    },
                    Some(gradient) => html! {
                        <div class="flex items-center gap-6">
                            <div class="w-36 h-36 rounded-full shrink-0" style={format!("background: {};", gradient)}></div>
                            <ul class="flex-1 space-y-2">
                                { for segments.iter().map(|s| html! {
                                    <li class="flex items-center justify-between text-sm">
                                        <span class="flex items-center gap-2">
                                            <span class="w-3 h-3 rounded-full" style={format!("background: {};", s.color)}></span>
                                            <span class="text-foreground">{ s.name.clone() }</span>
                                        </span>
                                        <span class="text-muted-foreground">
                                            { format!("{} ({}%)", format_currency(s.amount, &props.currency_symbol), s.percent.round() as i64) }
                                        </span>
                                    </li>
                                }) }
                            </ul>
                        </div>
                    },
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub year: i32,
    pub series: Vec<MonthTotals>,
}

const BAR_HEIGHT_PX: i64 = 160;

fn bar_height(value: i64, peak: i64) -> i64 {
    if peak <= 0 {
        0
    } else {
        (i128::from(value) * i128::from(BAR_HEIGHT_PX) / i128::from(peak)) as i64
    }
}

#[function_component(BarChart)]
pub fn bar_chart(props: &BarChartProps) -> Html {
    let peak = props.series.iter().map(MonthTotals::peak).max().unwrap_or(0);
    let bar = |value: i64, color: &str| {
        html! {
            <div class="w-2 rounded-t" style={format!("height: {}px; background: {};", bar_height(value, peak), color)}></div>
        }
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <div class="flex items-center justify-between mb-4">
                <h3 class="font-bold text-foreground text-lg">{ format!("{}년 월별 추이", props.year) }</h3>
                <div class="flex gap-3 text-xs text-muted-foreground">
                    <span class="flex items-center gap-1"><span class="w-2 h-2 rounded-full bg-[#01B574]"></span>{"수입"}</span>
                    <span class="flex items-center gap-1"><span class="w-2 h-2 rounded-full bg-[#EC407A]"></span>{"지출"}</span>
                    <span class="flex items-center gap-1"><span class="w-2 h-2 rounded-full bg-[#4318FF]"></span>{"저축"}</span>
                </div>
            </div>
            if peak == 0 {
                <div class="h-40 flex items-center justify-center text-sm text-muted-foreground">{"데이터 없음"}</div>
            } else {
                <div class="flex items-end justify-between gap-2" style={format!("height: {}px;", BAR_HEIGHT_PX)}>
                    { for props.series.iter().map(|m| html! {
                        <div class="flex items-end gap-[2px]" title={format!("{}월", m.month)}>
                            { bar(m.income, "#01B574") }
                            { bar(m.expense, "#EC407A") }
                            { bar(m.savings, "#4318FF") }
                        </div>
                    }) }
                </div>
                <div class="flex justify-between gap-2 mt-2 text-[10px] text-muted-foreground">
                    { for props.series.iter().map(|m| html! { <span class="w-8 text-center">{ format!("{}월", m.month) }</span> }) }
                </div>
            }
        </div>
    }
}
