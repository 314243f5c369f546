//! Sample inputs for testing and for `channel-sheet --init`.

/// A short satellite lineup touching every default category.
pub fn sample_channels_csv() -> &'static str {
    r#"number,code,description
2,KCBS,CBS Los Angeles
4,KNBC,NBC Los Angeles
7,KABC,ABC Los Angeles
11,KTTV,FOX Los Angeles
28,KCET,PBS SoCal
110,AMC,AMC
114,TBS,TBS
118,HALL,Hallmark Channel
138,QVC,QVC
140,ESPN,ESPN
143,ESPN2,ESPN2
154,NFL,NFL Network
172,DISNEY,Disney Channel
176,NICK,Nickelodeon
180,TOON,Cartoon Network
200,CNN,CNN
202,HLN,HLN
205,FNC,Fox News
209,MSNBC,MSNBC
214,WEATH,The Weather Channel
222,HSN,Home Shopping Network
260,TBN,Trinity Broadcasting
261,EWTN,EWTN
843,VIX,ViX
850,PRTGS,Portugues
946,LMUSC,Latin Music
952,AUDCL,Classical
"#
}

/// A config matching the original two-page, four-column sheet.
pub fn sample_config_yaml() -> &'static str {
    r##"# Channel sheet configuration
channels_csv: channels.csv
output_pdf: outputs/channels.pdf

house_name: My House
title_suffix: TV Channels

columns: 4
# Leave rows_per_column unset to split evenly across target_pages.
target_pages: 2
sort_by_number: true
show_description: false

cell_left_indent: 36
cell_style: text
fold_guides: true

margins:
  left: 36
  right: 36
  top: 36
  bottom: 36

fonts:
  header_font: Helvetica-Bold
  header_size: 14
  header_leading: 16
  cell_font: Helvetica
  cell_size: 8
  cell_leading: 9.5
  legend_font: Helvetica
  legend_size: 7
  legend_leading: 8.5

legend_line1: "Local|News|Sports|Kids|Faith"
legend_line2: "Shop|Music|Intl|TV"

colors:
  Local: "#3366CC"
  News: "#CC0000"
  Sports: "#008800"
  Kids: "#FF9900"
  Faith: "#663399"
  Shop: "#CC33CC"
  Music: "#0099CC"
  Intl: "#996600"
  TV: "#000000"

logos:
  enabled: false
  dir: outputs/logos
  display_px: 9
"##
}
