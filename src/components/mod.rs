pub mod bubble_canvas;
