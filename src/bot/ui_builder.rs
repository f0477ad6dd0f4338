//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use crate::catalog::Product;

use super::callback_handler::ProductAction;

// Reply-keyboard trigger labels. Trigger matching compares against these
// verbatim, so they double as the wire format of the reply keyboards.
pub const ADD_PRODUCT: &str = "➕ Add product";
pub const VIEW_PRODUCTS: &str = "📦 View products";
pub const DELETE_PRODUCTS: &str = "❌ Delete product";
pub const PLACE_ORDER: &str = "🛒 Place order";
pub const SHARE_CONTACT: &str = "📞 Share contact";

// Shared replies.
pub const UNRECOGNIZED_INPUT: &str = "I didn't understand that. Use the buttons or send /start.";
pub const TRANSIENT_ERROR: &str = "Something went wrong on our side, please try again.";
pub const NO_PRODUCTS: &str = "No products yet.";
pub const NO_PRODUCTS_TO_DELETE: &str = "No products to remove.";
pub const NO_PRODUCTS_TO_ORDER: &str = "No products available to order yet.";

/// Persistent admin menu shown on /start for the admin account.
pub fn admin_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(ADD_PRODUCT)],
        vec![KeyboardButton::new(VIEW_PRODUCTS)],
        vec![KeyboardButton::new(DELETE_PRODUCTS)],
    ])
    .resize_keyboard()
}

/// Keyboard shown to registered customers.
pub fn order_entry_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(PLACE_ORDER)]]).resize_keyboard()
}

/// One-button keyboard requesting the user's contact for the phone step.
pub fn contact_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(SHARE_CONTACT).request(ButtonRequest::Contact)
    ]])
    .resize_keyboard()
}

/// A catalog-driven reply: a dedicated empty-state text, or a prompt with
/// one selectable control per product. An empty catalog never renders an
/// empty picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerReply {
    NoProducts(&'static str),
    Picker(&'static str, InlineKeyboardMarkup),
}

/// Decide the reply to the admin "view products" trigger.
pub fn view_products_reply(products: &[Product]) -> String {
    if products.is_empty() {
        NO_PRODUCTS.to_string()
    } else {
        format_product_list(products)
    }
}

/// Decide the reply to the admin delete trigger.
pub fn delete_products_reply(products: &[Product]) -> PickerReply {
    if products.is_empty() {
        PickerReply::NoProducts(NO_PRODUCTS_TO_DELETE)
    } else {
        PickerReply::Picker("Select a product to remove:", delete_picker_keyboard(products))
    }
}

/// Decide the reply to the place-order trigger.
pub fn place_order_reply(products: &[Product]) -> PickerReply {
    if products.is_empty() {
        PickerReply::NoProducts(NO_PRODUCTS_TO_ORDER)
    } else {
        PickerReply::Picker("Select a product:", order_picker_keyboard(products))
    }
}

/// One selectable control per product for the admin delete picker.
pub fn delete_picker_keyboard(products: &[Product]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(products.iter().map(|product| {
        vec![InlineKeyboardButton::callback(
            product.name.clone(),
            ProductAction::Delete(product.id).encode(),
        )]
    }))
}

/// One selectable control per product for the order picker, labeled with the
/// display price.
pub fn order_picker_keyboard(products: &[Product]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(products.iter().map(|product| {
        vec![InlineKeyboardButton::callback(
            format!("{} - {}", product.name, product.price),
            ProductAction::Order(product.id).encode(),
        )]
    }))
}

/// Numbered product listing for the admin view.
pub fn format_product_list(products: &[Product]) -> String {
    let mut result = String::new();

    for product in products {
        result.push_str(&format!(
            "{}. {} - {}\n",
            product.id, product.name, product.price
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn sample_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Burger".to_string(),
                price: "25000".to_string(),
            },
            Product {
                id: 3,
                name: "Lavash".to_string(),
                price: "30000".to_string(),
            },
        ]
    }

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("Unexpected button kind: {other:?}"),
        }
    }

    #[test]
    fn test_admin_keyboard_layout() {
        let keyboard = admin_keyboard();
        let labels: Vec<&str> = keyboard
            .keyboard
            .iter()
            .map(|row| row[0].text.as_str())
            .collect();
        assert_eq!(labels, vec![ADD_PRODUCT, VIEW_PRODUCTS, DELETE_PRODUCTS]);
    }

    #[test]
    fn test_contact_keyboard_requests_contact() {
        let keyboard = contact_request_keyboard();
        let button = &keyboard.keyboard[0][0];
        assert_eq!(button.text, SHARE_CONTACT);
        assert!(matches!(button.request, Some(ButtonRequest::Contact)));
    }

    #[test]
    fn test_delete_picker_payloads() {
        let keyboard = delete_picker_keyboard(&sample_products());
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Burger");
        assert_eq!(callback_data(&keyboard.inline_keyboard[0][0]), "del_1");
        assert_eq!(callback_data(&keyboard.inline_keyboard[1][0]), "del_3");
    }

    #[test]
    fn test_order_picker_payloads_and_labels() {
        let keyboard = order_picker_keyboard(&sample_products());
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Burger - 25000");
        assert_eq!(callback_data(&keyboard.inline_keyboard[0][0]), "order_1");
        assert_eq!(callback_data(&keyboard.inline_keyboard[1][0]), "order_3");
    }

    #[test]
    fn test_format_product_list() {
        let listing = format_product_list(&sample_products());
        assert_eq!(listing, "1. Burger - 25000\n3. Lavash - 30000\n");
    }

    #[test]
    fn test_format_product_list_empty() {
        assert_eq!(format_product_list(&[]), "");
    }

    #[test]
    fn test_view_products_reply_empty_state() {
        assert_eq!(view_products_reply(&[]), NO_PRODUCTS);
        assert_eq!(
            view_products_reply(&sample_products()),
            "1. Burger - 25000\n3. Lavash - 30000\n"
        );
    }

    #[test]
    fn test_delete_products_reply_empty_state() {
        assert_eq!(
            delete_products_reply(&[]),
            PickerReply::NoProducts(NO_PRODUCTS_TO_DELETE)
        );

        match delete_products_reply(&sample_products()) {
            PickerReply::Picker(prompt, keyboard) => {
                assert_eq!(prompt, "Select a product to remove:");
                assert_eq!(keyboard.inline_keyboard.len(), 2);
            }
            other => panic!("Unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_place_order_reply_empty_state() {
        assert_eq!(
            place_order_reply(&[]),
            PickerReply::NoProducts(NO_PRODUCTS_TO_ORDER)
        );

        match place_order_reply(&sample_products()) {
            PickerReply::Picker(prompt, keyboard) => {
                assert_eq!(prompt, "Select a product:");
                assert_eq!(keyboard.inline_keyboard.len(), 2);
            }
            other => panic!("Unexpected reply: {other:?}"),
        }
    }
}
