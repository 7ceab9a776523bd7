use yew::prelude::*;

const PALETTE: [&str; 40] = [
    "🏠", "🍚", "🎸", "💰", "💵", "💸", "📈", "🐷", "🚌", "🚗", "☕", "🍺", "🍔", "🛒", "👕", "💄",
    "💊", "🏥", "📚", "🎓", "🎮", "🎬", "✈️", "🏖️", "🐶", "👶", "🎁", "💍", "📱", "💻", "💡", "🔧",
    "🧾", "🏦", "💳", "🪙", "📦", "🎉", "⚽", "🌱",
];

#[derive(Properties, PartialEq)]
pub struct EmojiPickerProps {
    pub on_pick: Callback<String>,
    pub on_close: Callback<()>,
}

#[function_component(EmojiPicker)]
pub fn emoji_picker(props: &EmojiPickerProps) -> Html {
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <div class="fixed inset-0 bg-black/40 flex items-center justify-center z-50" onclick={on_close.clone()}>
            <div class="bg-card rounded-2xl shadow-lg p-4 w-80" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="flex items-center justify-between mb-3">
                    <h4 class="text-sm font-bold text-[#2B3674]">{"아이콘 선택"}</h4>
                    <button class="text-muted-foreground text-sm" onclick={on_close}>{"닫기"}</button>
                </div>
                <div class="grid grid-cols-8 gap-1">
                    { for PALETTE.iter().map(|emoji| {
                        let on_pick = props.on_pick.clone();
                        let value = emoji.to_string();
                        html! {
                            <button class="text-xl p-1 rounded hover:bg-secondary" onclick={Callback::from(move |_| on_pick.emit(value.clone()))}>
                                { *emoji }
                            </button>
                        }
                    }) }
                </div>
            </div>
        </div>
    }
}
