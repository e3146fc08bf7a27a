use payloads::{Device, DeviceId};
use yew::prelude::*;

use crate::hooks::use_devices;

#[function_component]
pub fn DevicesPage() -> Html {
    let devices_hook = use_devices();

    let on_refresh = {
        let refetch = devices_hook.refetch.clone();
        Callback::from(move |_: MouseEvent| refetch.emit(true))
    };

    let body = if devices_hook.is_initial_loading() {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Loading devices..."}
            </p>
        }
    } else if devices_hook.devices.is_empty() && devices_hook.error.is_none() {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"No devices available"}
            </p>
        }
    } else {
        html! {
            <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {for devices_hook.devices.iter().map(|device| html! {
                    <DeviceRow
                        key={device.id.0.clone()}
                        device={device.clone()}
                        reserving={devices_hook.is_reserving(&device.id)}
                        on_reserve={devices_hook.reserve.clone()}
                    />
                })}
            </ul>
        }
    };

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{"Devices"}</h1>
                <button
                    onclick={on_refresh}
                    disabled={devices_hook.is_loading}
                    class="px-3 py-1 rounded-md border border-neutral-300"
                >
                    {"Refresh"}
                </button>
            </div>
            {for devices_hook.error.iter().map(|error| html! {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 \
                            border border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">
                        {format!("Error loading devices: {error}")}
                    </p>
                </div>
            })}
            {for devices_hook.reservation_error.iter().map(|error| html! {
                <p class="text-sm text-red-700 dark:text-red-400">
                    {format!("Reservation failed: {error}")}
                </p>
            })}
            {body}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct DeviceRowProps {
    device: Device,
    reserving: bool,
    on_reserve: Callback<DeviceId>,
}

#[function_component]
fn DeviceRow(props: &DeviceRowProps) -> Html {
    let device = &props.device;
    let onclick = {
        let on_reserve = props.on_reserve.clone();
        let id = device.id.clone();
        Callback::from(move |_: MouseEvent| on_reserve.emit(id.clone()))
    };
    let details: Vec<&str> = [&device.manufacturer, &device.model]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect();

    html! {
        <li class="py-3 flex items-center justify-between">
            <div>
                <p class="font-medium">{&device.name}</p>
                if !details.is_empty() {
                    <p class="text-sm text-neutral-500">{details.join(" ")}</p>
                }
                if let Some(description) = &device.description {
                    <p class="text-sm text-neutral-500">{description}</p>
                }
                <p class="text-xs text-neutral-500">
                    {device.status.to_string()}
                    if let Some(stock) = device.stock {
                        {format!(" · {stock} in stock")}
                    }
                </p>
            </div>
            <button
                {onclick}
                disabled={props.reserving || !device.is_available()}
                class="px-3 py-1 rounded-md bg-blue-600 text-white \
                       disabled:opacity-50"
            >
                {if props.reserving { "Reserving..." } else { "Reserve" }}
            </button>
        </li>
    }
}
