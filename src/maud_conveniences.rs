use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-gray-300 text-sm font-bold mb-2" {(label)}
            (input)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    ty: Option<&'static str>,
    value: &str,
) -> Markup {
    form_element(id, label, html! {
        input type=(ty.unwrap_or("text")) id=(id) name=(id) value=(value) class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
    })
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}
