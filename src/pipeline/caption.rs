// src/pipeline/caption.rs

//! Caption rendering.
//!
//! Produces the HTML-subset message body. Field inclusion depends on the
//! raw feed category: land-like listings show lot area instead of a room
//! count, except houses which show both. That override is intentional and
//! carried over from the original deployment.

use crate::models::{CaptionConfig, Listing};

/// Raw categories that show lot area and normally hide the room count.
const LAND_CATEGORIES: [&str; 3] = ["дом", "участок", "коммерция"];

/// Render the caption for one listing.
pub fn format_caption(listing: &Listing, links: &CaptionConfig) -> String {
    let land = LAND_CATEGORIES.contains(&listing.category_key.as_str());

    let lot_area = if land {
        format!("📏 <b>Площа ділянки:</b> {}сот\n", listing.lot_area)
    } else {
        String::new()
    };

    // Houses are in the land set but still show the room count
    let rooms = if !land || listing.category_key == "дом" {
        format!("🪟 #Кімнат_{}\n", listing.rooms)
    } else {
        String::new()
    };

    format!(
        " #{offer_type} #{category} ID{id}\n\
         📍 #{address} #{sub_locality} #{district}\n\
         {rooms}\
         ◽️ <b>Площа:</b> {area}м²\n\
         {lot_area}\
         💲 <b>Ціна:</b> {price}\n\
         📱 {phone} {name}\n\
         📩️️ <a href='{channel}'>{channel}</a>\n\n\
         Детальніше <a href='{url}'>на сайті тут</a>\n\
         Посилання на канал <a href='{invite}'>тут</a>\n",
        offer_type = listing.offer_type,
        category = listing.category,
        id = listing.internal_id,
        address = listing.address,
        sub_locality = listing.sub_locality_name,
        district = listing.district,
        rooms = rooms,
        area = listing.area,
        lot_area = lot_area,
        price = listing.price,
        phone = listing.phone,
        name = listing.name,
        channel = links.channel_url,
        url = listing.url,
        invite = links.invite_url,
    )
}
